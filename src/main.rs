//! One-shot RunPod account exporter for the Prometheus textfile collector.
//!
//! Fetches the account snapshot, formats it as exposition text, and
//! atomically replaces the metrics file. Scheduling is left to an external
//! timer; each invocation is independent.

mod account;
mod config;
mod error;
mod metrics;
mod textfile;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "runpod-exporter")]
#[command(about = "Publishes RunPod account metrics for a textfile-collector agent")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file (defaults to $RUNPOD_EXPORTER_CONFIG,
    /// then ./config.yml, then ~/.config/runpod-exporter/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("export failed: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let api_key = config.api_key(&config_path)?;

    let snapshot = account::client::fetch_account(api_key).context("fetching account snapshot")?;
    let fetched_at = chrono::Utc::now();
    info!(
        pods = snapshot.pods.len(),
        endpoints = snapshot.endpoints.len(),
        "fetched account snapshot"
    );

    let lines = metrics::collect(&snapshot, fetched_at).context("selecting metrics")?;
    let rendered = metrics::render(&lines);
    let published = textfile::publish(&config.textfile_path, &rendered)
        .context("publishing metrics file")?;
    info!(
        path = %published.display(),
        metrics = lines.len(),
        "published metrics"
    );
    Ok(())
}
