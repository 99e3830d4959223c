use crate::canonical::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemgraphConfig {
    /// Project root to analyze
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Extra gitignore-style patterns
    pub exclude: Vec<String>,
    pub languages: Vec<Language>,
    /// Registration threads
    pub workers: usize,
    pub format: ReportFormat,
}

impl Default for SemgraphConfig {
    fn default() -> Self {
        Self {
            path: None,
            exclude: Vec::new(),
            languages: Language::supported().to_vec(),
            workers: 1,
            format: ReportFormat::Human,
        }
    }
}

impl SemgraphConfig {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(self.path.as_deref().unwrap_or("."))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("semgraph.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SemgraphConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SemgraphConfig = toml::from_str(&contents)?;
    if config.languages.contains(&Language::Unknown) {
        anyhow::bail!("{}: `unknown` is not an analyzable language", path.display());
    }
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SemgraphConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("semgraph.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semgraph.toml");
        std::fs::write(&path, "exclude = [\"gen/\"]\nlanguages = [\"python\"]\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.exclude, vec!["gen/"]);
        assert_eq!(config.languages, vec![Language::Python]);
        assert_eq!(config.workers, 1);
        assert_eq!(config.format, ReportFormat::Human);
        assert_eq!(config.root(), PathBuf::from("."));
    }

    #[test]
    fn test_write_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semgraph.toml");
        let config = SemgraphConfig {
            workers: 4,
            format: ReportFormat::Json,
            ..SemgraphConfig::default()
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semgraph.toml");
        std::fs::write(&path, "languages = [\"unknown\"]\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
