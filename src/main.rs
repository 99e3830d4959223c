//! Semgraph CLI - unresolved identifier checks over mixed-language projects

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use commands::ProjectArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "semgraph")]
#[command(version)]
#[command(about = "Language-agnostic semantic graph - find unresolved identifiers in Java, Python and TypeScript")]
#[command(long_about = r#"
Semgraph parses every source file into one canonical AST, registers what each
file declares and imports, then reports every reference it cannot account for.

Example usage:
  semgraph check --path ./src
  semgraph check --format json --workers 4
  semgraph dump src/app.ts
  semgraph check-raw trees.json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress progress output (also SEMGRAPH_QUIET=1)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project and report unresolved identifiers
    Check {
        /// Project root (defaults to the config's path, then the current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Registration threads
        #[arg(short, long)]
        workers: Option<usize>,

        /// Config file (defaults to ./semgraph.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Analyze a JSON array of raw trees produced by an external parser
    CheckRaw {
        /// JSON file holding the raw trees
        file: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        #[arg(short, long, default_value = "1")]
        workers: usize,
    },

    /// Print one file's canonical nodes
    Dump {
        file: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Print the project-wide namespace table
    Namespaces {
        #[arg(short, long)]
        path: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default semgraph.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Show version information
    Version {
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

impl From<FormatArg> for OutputMode {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Human => OutputMode::Human,
            FormatArg::Json => OutputMode::Json,
        }
    }
}

/// Print a JSON envelope for a successful command on stdout
pub fn emit_success(command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    semgraph::output::set_quiet(cli.quiet);

    // Initialize logging on stderr so JSON on stdout stays clean
    let level = if cli.verbose {
        "debug"
    } else if semgraph::output::is_quiet() {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let has_errors = match cli.command {
        Commands::Check {
            path,
            format,
            workers,
            config,
        } => {
            let output_mode = commands::output_mode_for(format.map(Into::into), config.as_deref())?;
            commands::run_check(ProjectArgs { path, workers, config }, output_mode)?
        }

        Commands::CheckRaw {
            file,
            format,
            workers,
        } => {
            let output_mode = commands::output_mode_for(format.map(Into::into), None)?;
            commands::run_check_raw(&file, workers, output_mode)?
        }

        Commands::Dump { file, format } => {
            let output_mode = commands::output_mode_for(format.map(Into::into), None)?;
            commands::run_dump(&file, output_mode)?;
            false
        }

        Commands::Namespaces {
            path,
            format,
            config,
        } => {
            let output_mode = commands::output_mode_for(format.map(Into::into), config.as_deref())?;
            commands::run_namespaces(
                ProjectArgs {
                    path,
                    workers: None,
                    config,
                },
                output_mode,
            )?;
            false
        }

        Commands::Init {
            force,
            config,
            format,
        } => {
            commands::run_init(config, force, format.map_or(OutputMode::Human, Into::into))?;
            false
        }

        Commands::Version { format } => {
            commands::run_version(format.map_or(OutputMode::Human, Into::into))?;
            false
        }
    };

    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
