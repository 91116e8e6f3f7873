use anyhow::{Context, Result};
use clap::Parser;
use kwh_profile::config::Settings;
use kwh_profile::io::load_dataset;
use kwh_profile::report::Report;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kwh-report")]
#[command(about = "Compute chart data for one building's hourly energy usage", long_about = None)]
struct Cli {
    /// Path to the JSON building dataset
    dataset: PathBuf,

    /// TOML settings file (built-in defaults when absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the report (stdout when absent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let record = load_dataset(&cli.dataset)
        .with_context(|| format!("Failed to load dataset {}", cli.dataset.display()))?;

    let report = Report::build(&record, &settings);
    let missing = report.missing_sections();
    if !missing.is_empty() {
        tracing::info!(record = record.id(), ?missing, "report is incomplete");
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;

    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write report to stdout")?;
        }
    }

    Ok(())
}
