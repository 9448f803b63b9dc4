use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use covdelta::cli::{self, Style};
use covdelta::markdown::{MarkdownFormatter, DEFAULT_CRITICAL_DROP};

/// covdelta — Compare two Go coverage profiles for the files a branch changed.
#[derive(Parser)]
#[command(name = "covdelta", version, about)]
struct Cli {
    /// Log debug details to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the coverage change between two profiles.
    Report {
        /// Coverage profile of the base branch.
        old: PathBuf,

        /// Coverage profile of the branch being merged.
        new: PathBuf,

        /// JSON array of changed file paths, relative to the module root.
        changed_files: PathBuf,

        /// Module import path used to qualify changed files,
        /// e.g. github.com/owner/repo.
        #[arg(long, default_value = "")]
        root: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Style::Markdown)]
        format: Style,

        /// Prefix to strip from package and file names in the report.
        #[arg(long)]
        trim: Option<String>,

        /// Coverage drop, in percentage points, marked as critical.
        #[arg(long, default_value_t = DEFAULT_CRITICAL_DROP)]
        critical_threshold: f64,

        /// Write the report to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the overall coverage percentage of a single profile.
    Overall {
        /// Path to the coverage profile.
        profile: PathBuf,

        /// Glob matched against file base names to leave out (repeatable).
        #[arg(long)]
        ignore: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "covdelta=debug" } else { "covdelta=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Report {
            old,
            new,
            changed_files,
            root,
            format,
            trim,
            critical_threshold,
            output,
        } => {
            let formatter = MarkdownFormatter::new()
                .with_critical_drop(critical_threshold)
                .with_trim_prefix(trim);
            let report = cli::cmd_report(&old, &new, &changed_files, &root, format, &formatter)?;
            match output {
                Some(path) => std::fs::write(&path, report)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{report}"),
            }
        }
        Commands::Overall { profile, ignore } => {
            print!("{}", cli::cmd_overall(&profile, &ignore)?);
        }
    }

    Ok(())
}
