//! Journal compliance auditor (jc-audit) - Main entry point
//!
//! Checks a set of directories for weekly work journals and reports, per
//! person and week, which journals were submitted, which are missing and
//! which have naming or duplication problems.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jc_audit::AuditRun;
use jc_common::config::{AuditConfig, ConfigOverrides};
use jc_common::period::current_period;
use jc_common::PeriodRange;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Log level until the configured one is known
const STARTUP_LOG_LEVEL: &str = "info";

/// Command-line arguments for jc-audit
#[derive(Parser, Debug)]
#[command(name = "jc-audit")]
#[command(about = "Audit weekly work journals against a roster")]
#[command(version)]
struct Args {
    /// First week to check, `W` or `W/Y` (default: first week of the work year)
    start: Option<String>,

    /// Last week to check, `W` or `W/Y` (default: current week)
    end: Option<String>,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to search for journals; may be repeated
    #[arg(short, long = "dir")]
    dirs: Vec<PathBuf>,

    /// Roster file with one `lastName;firstName` entry per line
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// First calendar week of the work year (1-53)
    #[arg(long)]
    first_week: Option<u32>,

    /// Maximum number of typos tolerated in names and the journal keyword
    #[arg(long)]
    max_distance: Option<usize>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

/// Filter from `RUST_LOG`, else `fallback`
fn env_filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn main() -> Result<()> {
    // Initialize tracing first so configuration loading is logged;
    // the configured level replaces the startup level once known
    let (filter, filter_handle) = reload::Layer::new(env_filter_or(STARTUP_LOG_LEVEL));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let overrides = ConfigOverrides {
        config_path: args.config.clone(),
        directories: args.dirs.clone(),
        roster: args.roster.clone(),
        first_week_of_work_year: args.first_week,
        max_distance: args.max_distance,
    };
    let config = AuditConfig::load(overrides).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    filter_handle
        .reload(env_filter_or(&config.log_level))
        .context("Failed to apply configured log level")?;

    let config = config.validate().context("Invalid configuration")?;
    info!(
        directories = config.directories.len(),
        first_week = config.first_week_of_work_year,
        max_distance = config.max_distance,
        "Configuration loaded"
    );

    let today = current_period();
    let range = PeriodRange::from_args(
        args.start.as_deref(),
        args.end.as_deref(),
        config.first_week_of_work_year,
        today,
    )
    .context("Invalid period range")?;
    info!("Checking {} to {}", range.start, range.end);

    let run = AuditRun::from_config(&config, &range, today).context("Failed to prepare audit")?;
    let report = run.run();

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}
