//! `car_listings` binary: logging setup, CLI parsing and one pipeline run.
//!
//! ```sh
//! car_listings --max-pages 5 -o car_listings.csv
//! RUST_LOG=car_listings=debug car_listings --config cars.yaml
//! ```

use car_listings::cli::Cli;
use car_listings::runner::run;
use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("car_listings starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Run failures are logged here and never crash the process.
    match run(&args).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                ?elapsed,
                pages = summary.pages_attempted,
                failed_pages = summary.pages_failed,
                blocks = summary.blocks_found,
                listings = summary.listings,
                csv_written = summary.csv_written,
                json_written = summary.json_written,
                "Execution complete"
            );
        }
        Err(e) => error!(error = %e, "Unexpected error in main process"),
    }

    Ok(())
}
