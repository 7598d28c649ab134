//! binnacle - Main Entry Point
//!
//! Reads queries from stdin, answers them from a sample snapshot and prints
//! the results as text and a bar chart.

use anyhow::Context;
use binnacle::config::{AppConfig, LoggingConfig};
use binnacle::{Console, SnapshotBackend};
use clap::Parser;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Capacity of the stdin line channel
const LINE_CHANNEL_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "BINNACLE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON sample snapshot answering queries
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Chart width in columns
    #[arg(short, long)]
    width: Option<usize>,
}

fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "binnacle.log".into());
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::resolve(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(snapshot) = cli.snapshot {
        config.backend.snapshot = Some(snapshot);
    }
    if let Some(width) = cli.width {
        config.chart.width = width.max(1);
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);
    tracing::info!("Starting binnacle");

    let backend = match &config.backend.snapshot {
        Some(path) => SnapshotBackend::load(path)?,
        None => {
            tracing::warn!("No snapshot configured, every query will come back empty");
            SnapshotBackend::new(Vec::new())
        }
    }
    .with_max_samples(config.backend.max_samples);

    let console = Console::spawn(backend, &config)?;

    let (line_tx, line_rx) = crossbeam_channel::bounded(LINE_CHANNEL_CAPACITY);
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })
        .context("Failed to spawn stdin reader")?;

    let mut stdout = std::io::stdout().lock();
    let view = console.run(line_rx, &mut stdout)?;

    tracing::info!(query = %view.query, samples = view.samples.len(), "Shutting down...");
    Ok(())
}
