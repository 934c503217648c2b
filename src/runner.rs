//! Run orchestration: configuration to files on disk.

use crate::cli::Cli;
use crate::config::ScrapeConfig;
use crate::normalize::normalize;
use crate::outputs;
use crate::scrapers::fetch::{FetchPage, HttpFetcher};
use crate::scrapers::pagination::PaginationWalker;
use crate::utils::ensure_writable_parent;
use std::error::Error;
use tracing::{error, info, instrument, warn};

/// What a run produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_attempted: u32,
    pub pages_failed: u32,
    pub blocks_found: usize,
    pub listings: usize,
    pub csv_written: bool,
    pub json_written: bool,
}

/// Resolve configuration, build the HTTP fetcher and run the pipeline.
///
/// # Errors
///
/// Only setup problems are returned, before any page is requested: a bad
/// configuration, an HTTP client that cannot be built, or an output directory
/// that cannot be created or written. The output check is a config-time
/// check. Write failures once the walk has run are logged by [`run_with`]
/// and leave the summary's `csv_written` unset.
pub async fn run(args: &Cli) -> Result<RunSummary, Box<dyn Error>> {
    let config = ScrapeConfig::from_cli(args).await?;
    info!(
        base_url = %config.base_url,
        max_pages = config.max_pages,
        output = %config.output.display(),
        "Configuration resolved"
    );

    // Early check: fail before spending minutes scraping.
    ensure_writable_parent(&config.output).await?;

    let fetcher = HttpFetcher::new(config.timeout, &config.user_agent)?;
    Ok(run_with(&config, fetcher).await)
}

/// Walk, normalize and write. Every failure past this point is logged and absorbed.
#[instrument(level = "info", skip_all)]
pub async fn run_with<F: FetchPage>(config: &ScrapeConfig, fetcher: F) -> RunSummary {
    let walker = PaginationWalker::new(fetcher, config.delay);
    let (raw, stats) = walker
        .walk_with_stats(&config.base_url, config.max_pages)
        .await;

    let mut summary = RunSummary {
        pages_attempted: stats.pages_attempted,
        pages_failed: stats.pages_failed,
        blocks_found: stats.blocks_found,
        listings: raw.len(),
        ..RunSummary::default()
    };
    info!(total = raw.len(), "Total cars scraped");

    if raw.is_empty() {
        warn!("No data to save");
        return summary;
    }

    let listings = normalize(raw);

    match outputs::csv::write_listings(&listings, &config.output).await {
        Ok(()) => summary.csv_written = true,
        Err(e) => error!(path = %config.output.display(), error = %e, "Error saving CSV"),
    }

    if let Some(path) = &config.json_output {
        match outputs::json::write_listings(&listings, path).await {
            Ok(()) => summary.json_written = true,
            Err(e) => error!(path = %path.display(), error = %e, "Error saving JSON"),
        }
    }

    summary
}
