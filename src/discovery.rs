//! Project discovery - which files to analyze
//!
//! Walks a project root honoring `.gitignore`/`.ignore`, drops noise
//! directories and binaries, and keeps files whose extension maps to an
//! enabled language.

use crate::adapter::Grammar;
use crate::canonical::Language;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, extra_excludes: Option<&[String]>) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        // 1. Load from .gitignore and .ignore
        builder.add(root.join(".gitignore"));
        builder.add(root.join(".ignore"));

        // 2. Add defaults (global)
        let defaults = [
            // Dependency and build output directories
            "target/", "node_modules/", "venv/", ".venv/", "vendor/",
            "dist/", "build/", "out/", "coverage/", "__pycache__/", "*.egg-info/",
            ".git/", ".semgraph/", ".vscode/", ".idea/", ".gradle/", ".mypy_cache/",

            // Generated declarations and compiled artifacts
            "*.d.ts", "*.min.js", "*.pyc", "*.pyo", "*.pyd", "*.class", "*.jar",
        ];

        for pattern in defaults {
            // Static patterns, known to be valid
            builder.add_line(None, pattern).ok();
        }

        // 3. Add user config excludes
        if let Some(excludes) = extra_excludes {
            for pattern in excludes {
                if let Err(e) = builder.add_line(None, pattern) {
                    tracing::warn!("Ignoring invalid exclude pattern {:?}: {}", pattern, e);
                }
            }
        }

        Self {
            inner: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched_path_or_any_parents(path, is_dir).is_ignore()
    }
}

/// Map a path to its language, if the extension belongs to an enabled one
pub fn language_for_path(path: &Path, languages: &[Language]) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    let language = Grammar::from_extension(ext)?.language();
    languages.contains(&language).then_some(language)
}

/// Find every analyzable file under `root`, sorted.
pub fn discover(root: &Path, excludes: &[String], languages: &[Language]) -> Vec<PathBuf> {
    let filter = IgnoreFilter::new(root, Some(excludes));

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| !filter.is_ignored(path, false))
        .filter(|path| language_for_path(path, languages).is_some())
        .collect();

    files.sort();
    tracing::debug!("discovered {} files under {}", files.len(), root.display());
    files
}
