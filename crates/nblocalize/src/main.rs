//! nblocalize - English-only rewrite of a Jupyter notebook
//!
//! Adds Colab/Kaggle badges at the top of the notebook and removes Persian
//! text from markdown and raw cells. Code cells are left alone.
//!
//! Usage:
//!   nblocalize                      Rewrite `<repo>.ipynb` in the current directory
//!   nblocalize path/to/nb.ipynb     Rewrite a specific notebook
//!   nblocalize --dry-run --json     Report what would change without writing

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use nblocalize_core::{localize_file, LocalizeOptions, LocalizeReport};
use std::path::PathBuf;

mod config;

use config::{BadgeOverrides, Config};

#[derive(Parser, Debug)]
#[command(name = "nblocalize")]
#[command(about = "Rewrite a Jupyter notebook as English-only and add Colab/Kaggle badges")]
#[command(version)]
struct Args {
    /// Notebook to rewrite (defaults to <ROOT>/<NOTEBOOK_NAME>)
    notebook: Option<PathBuf>,

    /// Repository root holding the notebook (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Repository owner used in badge links
    #[arg(long)]
    owner: Option<String>,

    /// Repository name used in badge links
    #[arg(long)]
    repo: Option<String>,

    /// Notebook path inside the repository, used in badge links
    #[arg(long, value_name = "FILE")]
    notebook_name: Option<String>,

    /// Report what would change without writing the notebook
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show per-cell details
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn badge_overrides(&self) -> BadgeOverrides {
        BadgeOverrides {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            notebook: self.notebook_name.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let root = match args.root.clone() {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let config = Config::discover(&root);
    let badges = config.badge_config(&args.badge_overrides());
    let path = args
        .notebook
        .clone()
        .unwrap_or_else(|| root.join(&badges.notebook));

    let report = localize_file(
        &path,
        &badges,
        LocalizeOptions {
            dry_run: args.dry_run,
        },
    )
    .with_context(|| format!("Failed to localize notebook: {}", path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !args.quiet {
        println!("{}", confirmation_line(&report));
        if args.verbose || args.dry_run {
            println!("{}", summary_line(&report));
        }
    }

    Ok(())
}

/// Log to stderr, `RUST_LOG` aware, warnings only unless verbose
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn confirmation_line(report: &LocalizeReport) -> String {
    let path = report
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if report.written {
        format!(
            "{} {path}",
            "Notebook updated in English and badges added:".green()
        )
    } else {
        format!("{} {path}", "Dry run, notebook not written:".yellow())
    }
}

fn summary_line(report: &LocalizeReport) -> String {
    format!(
        "header {}, {} replaced, {} redacted ({} lines removed), {} code cells skipped, {} cells total",
        if report.header_inserted { "inserted" } else { "present" },
        report.cells_replaced,
        report.cells_redacted,
        report.lines_removed,
        report.code_cells_skipped,
        report.cells_total,
    )
}
