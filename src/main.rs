//! drvscan: scan local directories for known vulnerable or malicious
//! drivers by checksum, using the loldrivers.io dataset.
//!
//! This is the main entry point for the CLI application.

use drvscan::core::error::Result;
use drvscan::drivers::{loader, HashIndex};
use drvscan::scanner::ScanPipeline;
use drvscan::ui::cli::Cli;
use drvscan::ui::output::{self, ConsoleWriter};
use drvscan::utils::logging::{init_logging, LogConfig};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse_args();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(log_config)?;

    log::info!("drvscan v{}", env!("CARGO_PKG_VERSION"));

    // The CLI is consumed by config assembly, so take the format first.
    let format = cli.output_format();
    let config = Arc::new(cli.into_config()?);

    let records = loader::load(&config.dataset.source).await?;
    log::info!("loaded {} driver records", records.len());

    let index = Arc::new(HashIndex::build(records));
    log::debug!("indexed {} known-bad digests", index.digest_count());
    if index.is_empty() {
        log::warn!("the driver dataset contains no usable checksums");
    }

    let mut writer = ConsoleWriter::new(format);
    let pipeline = Arc::new(ScanPipeline::new(index, config));

    // Ctrl-C requests cancellation; in-flight files finish hashing.
    {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("cancellation requested, stopping the scan");
                pipeline.cancel();
            }
        });
    }

    let summary = pipeline.run(&mut writer).await?;

    output::log_summary(&summary);
    log::debug!("finished in {:.2}s", started.elapsed().as_secs_f64());

    Ok(())
}
