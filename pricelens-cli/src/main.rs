//! PriceLens CLI: fetch daily prices, export CSV/JSON, render charts.
//!
//! Modes:
//! - `--symbol S [--period P]`: run one symbol
//! - `--all [--config PATH]`: run every symbol listed in the config
//!
//! With neither flag the help text is printed.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use pricelens_core::data::{DataProvider, SyntheticProvider, YahooProvider};
use pricelens_core::{LogSink, OutputLayout};
use pricelens_runner::{BatchConfig, Pipeline, TracingLog, DEFAULT_PERIOD};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "pricelens",
    about = "PriceLens: daily price history to CSV, JSON and charts"
)]
struct Cli {
    /// Symbol to run (e.g. 2330, 2330.TW, ^TWII).
    #[arg(long)]
    symbol: Option<String>,

    /// Period: 1w, 1m, 3m, 6m, 1y, 3y, or a number of days.
    #[arg(long, default_value = DEFAULT_PERIOD)]
    period: String,

    /// Batch config file (JSON, or TOML by extension).
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run every symbol in the config.
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Output root for csv/, json/ and charts/.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for daily log files.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Use deterministic synthetic bars instead of the network.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.all && cli.symbol.is_none() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let log = Arc::new(
        TracingLog::new(&cli.log_dir)
            .with_context(|| format!("cannot open log directory {}", cli.log_dir.display()))?,
    );
    log.info(&format!("Created directory: {}", cli.log_dir.display()));

    let layout = OutputLayout::new(&cli.data_dir);
    let dirs = layout
        .create_dirs()
        .with_context(|| format!("cannot create output directories under {}", cli.data_dir.display()))?;
    for dir in &dirs {
        log.info(&format!("Created directory: {}", dir.display()));
    }

    let provider: Box<dyn DataProvider> = if cli.synthetic {
        Box::new(SyntheticProvider)
    } else {
        Box::new(YahooProvider::new().context("cannot build HTTP client")?)
    };
    let pipeline = Pipeline::new(provider, layout, log.clone());

    if cli.all {
        run_batch(&pipeline, &cli.config, log.as_ref());
    } else if let Some(symbol) = &cli.symbol {
        if let Err(e) = pipeline.run_one(symbol, &cli.period) {
            log.error(&e.to_string());
        }
    }

    Ok(())
}

fn run_batch(pipeline: &Pipeline, config_path: &std::path::Path, log: &dyn LogSink) {
    let config = match BatchConfig::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            log.error(&e.to_string());
            return;
        }
    };

    let report = pipeline.run_many(&config.stocks, &config.default_period);
    if !report.all_succeeded() {
        log.info(&format!(
            "{} of {} symbols failed",
            report.failed(),
            report.outcomes.len()
        ));
    }
}
