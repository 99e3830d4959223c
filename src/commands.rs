use crate::{emit_success, OutputMode};
use owo_colors::OwoColorize;
use semgraph::adapter::{self, ProviderRegistry};
use semgraph::config::{self, ReportFormat, SemgraphConfig};
use semgraph::discovery;
use semgraph::raw::RawArena;
use semgraph::report::Report;
use semgraph::ui::{self, Icons, ProgressManager, ProgressMessage, ProgressPhase};
use semgraph::{Analysis, Analyzer, Canonicalizer, Language, RawAst, SkippedFile};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Flags shared by commands that analyze a project directory
pub struct ProjectArgs {
    pub path: Option<PathBuf>,
    pub workers: Option<usize>,
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    /// Config file values, overridden by whatever was given on the command line
    fn resolve(&self) -> anyhow::Result<SemgraphConfig> {
        let mut config = config::load_config(self.config.as_deref())?.unwrap_or_default();
        if let Some(path) = &self.path {
            config.path = Some(path.to_string_lossy().to_string());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if config.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        Ok(config)
    }
}

/// Output mode from an explicit flag, else from the config file
pub fn output_mode_for(flag: Option<OutputMode>, config: Option<&Path>) -> anyhow::Result<OutputMode> {
    if let Some(mode) = flag {
        return Ok(mode);
    }
    let format = config::load_config(config)?
        .map(|c| c.format)
        .unwrap_or_default();
    Ok(match format {
        ReportFormat::Human => OutputMode::Human,
        ReportFormat::Json => OutputMode::Json,
    })
}

/// Read and parse every discovered file. Unreadable or unparsable files are skipped.
fn parse_project(
    root: &Path,
    files: &[PathBuf],
    registry: &ProviderRegistry,
    tx: &crossbeam::channel::Sender<ProgressMessage>,
) -> (Vec<RawAst>, Vec<SkippedFile>) {
    let mut raws = Vec::new();
    let mut skipped = Vec::new();

    tx.send(ProgressMessage::Started {
        phase: ProgressPhase::Parsing,
        total: files.len(),
    })
    .ok();

    for file in files {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let shown = relative.to_string_lossy().replace('\\', "/");

        let parsed = std::fs::read_to_string(file)
            .map_err(semgraph::Error::from)
            .and_then(|content| registry.parse_file(Path::new(&shown), &content));

        match parsed {
            Ok(Some(raw)) => raws.push(raw),
            Ok(None) => tracing::debug!("No provider for {}", shown),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", shown, e);
                tx.send(ProgressMessage::Skipped(shown.clone())).ok();
                skipped.push(SkippedFile::new(shown.clone(), e.to_string()));
            }
        }

        tx.send(ProgressMessage::Progress {
            phase: ProgressPhase::Parsing,
            file: Some(shown),
        })
        .ok();
    }

    tx.send(ProgressMessage::Finished {
        phase: ProgressPhase::Parsing,
    })
    .ok();
    (raws, skipped)
}

/// Discover, parse and analyze a project directory
fn analyze_project(config: &SemgraphConfig, output_mode: OutputMode) -> anyhow::Result<Analysis> {
    let root = config.root();
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let files = discovery::discover(&root, &config.exclude, &config.languages);
    if output_mode.is_human() {
        ui::status(Icons::FOLDER, "Path", &root.display().to_string());
        ui::status(Icons::FILE, "Files", &files.len().to_string());
    }

    let registry = adapter::default_registry();
    let (progress, tx) = ProgressManager::new(files.len());
    let (raws, mut skipped) = parse_project(&root, &files, &registry, &tx);
    let mut analysis = Analyzer::new()
        .with_workers(config.workers)
        .analyze_with(raws, |event| {
            tx.send(event.into()).ok();
        });
    skipped.append(&mut analysis.skipped);
    analysis.skipped = skipped;
    tx.send(ProgressMessage::Exit).ok();
    drop(tx);
    progress.finish();

    Ok(analysis)
}

fn print_report(report: &Report, output_mode: OutputMode, command: &str) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::section(" Unresolved identifiers ");
        for entry in &report.errors {
            ui::diagnostic(entry);
        }
        for file in &report.skipped {
            ui::skipped(file);
        }
        println!();
        print!("{}", report.render_human());
    } else {
        emit_success(command, serde_json::to_value(report)?)?;
    }
    Ok(())
}

/// `check`: returns whether any unresolved identifier was reported
pub fn run_check(args: ProjectArgs, output_mode: OutputMode) -> anyhow::Result<bool> {
    let config = args.resolve()?;
    let started = Instant::now();

    if output_mode.is_human() {
        ui::header("Checking project");
    }

    let analysis = analyze_project(&config, output_mode)?;
    let report = Report::from_analysis(&analysis);
    print_report(&report, output_mode, "check")?;

    if output_mode.is_human() {
        ProgressManager::finish_with_summary(
            started.elapsed(),
            analysis.graph.len(),
            analysis.stats.references,
            analysis.stats.unresolved,
        );
    }
    Ok(report.has_errors())
}

/// `check-raw`: analyze raw trees produced by an external parser
pub fn run_check_raw(file: &Path, workers: usize, output_mode: OutputMode) -> anyhow::Result<bool> {
    if workers == 0 {
        anyhow::bail!("workers must be at least 1");
    }
    let contents = std::fs::read_to_string(file)?;
    let arenas: Vec<RawArena> = serde_json::from_str(&contents)?;
    tracing::info!("loaded {} raw trees from {}", arenas.len(), file.display());

    let analysis = Analyzer::new().with_workers(workers).analyze(arenas);
    let report = Report::from_analysis(&analysis);
    print_report(&report, output_mode, "check-raw")?;
    Ok(report.has_errors())
}

/// `dump`: one file's canonical nodes in pre-order
pub fn run_dump(file: &Path, output_mode: OutputMode) -> anyhow::Result<()> {
    let registry = adapter::default_registry();
    let content = std::fs::read_to_string(file)?;
    let Some(raw) = registry.parse_file(file, &content)? else {
        anyhow::bail!("no parser for {}", file.display());
    };
    raw.validate()?;

    let ast = Canonicalizer::new().canonicalize(raw);
    let nodes: Vec<_> = ast.preorder().collect();

    if output_mode.is_human() {
        ui::header(&format!("{} ({} nodes)", ast.file_path, nodes.len()));
        println!("{}", ui::node_table(&nodes));
    } else {
        emit_success("dump", serde_json::to_value(&nodes)?)?;
    }
    Ok(())
}

/// `namespaces`: the project-wide namespace table
pub fn run_namespaces(args: ProjectArgs, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = args.resolve()?;
    let analysis = analyze_project(&config, output_mode)?;
    let namespaces = analysis.graph.namespaces();

    if output_mode.is_human() {
        if namespaces.is_empty() {
            ui::info("Namespaces", "none declared");
        }
        for language in namespaces.languages() {
            ui::section(&format!(" {} ({}) ", language, namespaces.count(language)));
            for path in namespaces.paths(language) {
                println!("  {} {}", Icons::PACKAGE, path);
            }
        }
    } else {
        emit_success("namespaces", serde_json::to_value(namespaces)?)?;
    }
    Ok(())
}

pub fn run_init(config_path: Option<PathBuf>, force: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(config::default_config_path);
    let config = SemgraphConfig::default();
    config::write_config(&path, &config, force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
        let languages: Vec<&str> = config.languages.iter().map(Language::as_str).collect();
        ui::summary_row("languages", &languages.join(", "));
        ui::summary_row("workers", &config.workers.to_string());
    } else {
        let data = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        emit_success("init", data)?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::banner(
            &format!("{}", "Semgraph".bold().style(ui::theme().info.clone())),
            &format!("Version {}", env!("CARGO_PKG_VERSION").bold()),
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "languages": Language::supported(),
        });
        emit_success("version", data)?;
    }
    Ok(())
}
