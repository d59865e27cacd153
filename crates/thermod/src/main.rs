//! Thermod - streaming sensor telemetry daemon
//!
//! Wires the pipeline together at process start: a seeded windowed
//! generator feeds the broker through the reporter, and the stream
//! endpoint serves the broker to HTTP clients until shutdown.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (0.0.0.0:8080)
//! thermod
//!
//! # Custom config and verbose logging
//! thermod --config configs/thermo.toml --log-level debug
//! ```

mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use thermo_broker::{Broker, Topic};
use thermo_sensor::{Reporter, SensorGenerator, TEMPERATURE_TOPIC};
use thermo_stream::StreamServer;

use config::Config;

/// Thermod - streaming sensor telemetry daemon
#[derive(Parser, Debug)]
#[command(name = "thermod")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/thermo.toml")]
    config: std::path::PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = Config::load(&cli.config)?;
    run(config).await
}

async fn run(config: Config) -> Result<()> {
    let broker = Arc::new(Broker::new(Topic::new(TEMPERATURE_TOPIC), config.broker));
    let cancel = CancellationToken::new();

    // The reporter is spawned exactly once per process; there are no
    // restart semantics if its loop ever ends.
    let generator = SensorGenerator::new(config.sensor);
    let reporter = Reporter::new(generator, Arc::clone(&broker)).spawn(cancel.clone());

    let server = StreamServer::new(config.server, Arc::clone(&broker));
    let mut server_task = tokio::spawn(server.run(cancel.clone()));

    tokio::select! {
        _ = wait_for_shutdown() => {
            info!("shutdown signal received");
            cancel.cancel();
        }
        result = &mut server_task => {
            cancel.cancel();
            reporter.await?;
            match result {
                Ok(outcome) => outcome?,
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
    }

    // Drain both tasks before exiting
    reporter.await?;
    match server_task.await {
        Ok(outcome) => outcome?,
        Err(e) => return Err(e.into()),
    }

    let snapshot = broker.metrics().snapshot();
    info!(
        values_published = snapshot.values_published,
        values_consumed = snapshot.values_consumed,
        "thermod stopped"
    );

    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
