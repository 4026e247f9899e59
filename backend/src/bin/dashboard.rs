//! Implant Dashboard Binary
//!
//! Builds the static dashboard artifact from a usage export, checks an
//! existing artifact, or shows how descriptions normalize.
//!
//! # Usage
//!
//! ```bash
//! # Build the artifact from a CSV export
//! implant-dashboard build --input usage.csv --output public/data/dashboard.json
//!
//! # Check an artifact; exits non-zero on structural errors
//! implant-dashboard validate --artifact public/data/dashboard.json
//!
//! # Inspect normalization of a few descriptions
//! implant-dashboard normalize "ACETAB CUP SIZE 34" "Femoral Stem Long"
//! implant-dashboard normalize --vendor "Zimmer Inc" "DePuy Synthes"
//! ```
//!
//! # Environment Variables
//!
//! - `ANALYTICS_CONFIG`: Path to an `analytics.toml` (otherwise searched for)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use implant_analytics::artifact::{read_document, write_document};
use implant_analytics::config::AnalyticsConfig;
use implant_analytics::parsing::load_usage_rows;
use implant_analytics::services::{validate_document, DashboardBuilder};
use implant_analytics::transformations::primary_family;

#[derive(Debug, Parser)]
#[command(name = "implant-dashboard", version, about = "Implant vendor consolidation analytics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the dashboard artifact from usage rows (.csv or .json)
    Build {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "public/data/dashboard.json")]
        output: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write single-line JSON regardless of configuration
        #[arg(long)]
        compact: bool,
        /// Leave out the per-row components section
        #[arg(long)]
        no_components: bool,
    },
    /// Validate an existing artifact
    Validate {
        #[arg(long, default_value = "public/data/dashboard.json")]
        artifact: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print normalized labels for component (or vendor) descriptions
    Normalize {
        texts: Vec<String>,
        #[arg(long)]
        vendor: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Build {
            input,
            output,
            config,
            compact,
            no_components,
        } => {
            let config = AnalyticsConfig::resolve(config.as_deref())?;
            build(&config, input, output, compact, no_components)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { artifact, config } => {
            let config = AnalyticsConfig::resolve(config.as_deref())?;
            validate(&config, artifact)
        }
        Command::Normalize {
            texts,
            vendor,
            config,
        } => {
            let config = AnalyticsConfig::resolve(config.as_deref())?;
            let normalizers = config.normalizers()?;
            for text in texts {
                if vendor {
                    println!("{}\t{}", text, normalizers.vendor.normalize(&text));
                } else {
                    let label = normalizers.component.normalize(&text);
                    let family = primary_family(&label)
                        .map(|f| f.as_str())
                        .unwrap_or("-");
                    println!("{}\t{}\t{}", text, label, family);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build(
    config: &AnalyticsConfig,
    input: PathBuf,
    output: PathBuf,
    compact: bool,
    no_components: bool,
) -> anyhow::Result<()> {
    info!("Loading usage rows from {}", input.display());
    let aliases = config.column_aliases()?;
    let rows = load_usage_rows(&input, &aliases)
        .with_context(|| format!("failed to load {}", input.display()))?;

    if rows.is_empty() {
        if !config.pipeline.allow_empty_input {
            bail!(
                "{} contains no usage rows (set pipeline.allow_empty_input to build anyway)",
                input.display()
            );
        }
        warn!("Input has no usage rows; writing an empty dashboard");
    }

    let mut builder = DashboardBuilder::new(config)?;
    if no_components {
        builder = builder.with_components(false);
    }
    let document = builder.build(&rows);

    let pretty = config.output.pretty && !compact;
    let bytes = write_document(&output, &document, pretty)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "Dashboard written to {} ({} bytes, {} rows, checksum {})",
        output.display(),
        bytes,
        document.metadata.total_rows,
        document.metadata.dataset_checksum
    );
    Ok(())
}

fn validate(config: &AnalyticsConfig, artifact: PathBuf) -> anyhow::Result<ExitCode> {
    let document = read_document(&artifact)
        .with_context(|| format!("failed to read {}", artifact.display()))?;
    let report = validate_document(&document, &config.validation);

    for issue in report.errors.iter().chain(report.warnings.iter()) {
        println!(
            "[{:?}] {} ({}): {}",
            issue.criticality,
            issue.issue_type,
            issue.section.as_deref().unwrap_or("document"),
            issue.description
        );
    }
    info!(
        "Checked {} sections: {} errors, {} warnings",
        report.sections_checked,
        report.errors.len(),
        report.warnings.len()
    );

    if report.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
