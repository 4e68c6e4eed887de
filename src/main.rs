mod config;
mod driver;
mod expected;
mod workload;

use anyhow::Result;
use clap::Parser;
use config::CliConfig;
use std::io;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = CliConfig::parse();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let report = driver::run(&config, &mut handle)?;

    info!(
        "Benchmark finished: {} rounds, {} ms total",
        report.round_times.len(),
        report.round_times.iter().map(|d| d.as_millis()).sum::<u128>()
    );

    Ok(())
}
