//! Sequential walk over the results pages.

use crate::models::RawListing;
use crate::scrapers::fetch::FetchPage;
use crate::scrapers::listing::extract_page;
use crate::utils::truncate_for_log;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Totals for one walk, for the run summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    pub pages_attempted: u32,
    pub pages_failed: u32,
    pub blocks_found: usize,
}

/// Drives page-by-page fetching and extraction.
///
/// Pages are visited strictly in order, one at a time, with a fixed pause
/// after every page whether it succeeded or not.
#[derive(Debug)]
pub struct PaginationWalker<F> {
    fetcher: F,
    delay: Duration,
}

impl<F: FetchPage> PaginationWalker<F> {
    pub fn new(fetcher: F, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Visit pages `1..=max_pages` and collect every listing extracted.
    ///
    /// Never fails: a page that cannot be fetched is logged and skipped.
    pub async fn walk(&self, base: &Url, max_pages: u32) -> Vec<RawListing> {
        self.walk_with_stats(base, max_pages).await.0
    }

    #[instrument(level = "info", skip_all, fields(base = %base, max_pages = max_pages))]
    pub async fn walk_with_stats(
        &self,
        base: &Url,
        max_pages: u32,
    ) -> (Vec<RawListing>, WalkStats) {
        let t0 = Instant::now();
        let mut listings = Vec::new();
        let mut stats = WalkStats::default();

        for page in 1..=max_pages {
            stats.pages_attempted += 1;
            let url = page_url(base, page);

            match self.fetcher.fetch(&url).await {
                Ok(body) => {
                    let (found, mut extracted) = extract_page(&body);
                    stats.blocks_found += found;
                    info!(page, found, kept = extracted.len(), "Scraped page");
                    if found == 0 {
                        debug!(
                            page,
                            preview = %truncate_for_log(&body, 300),
                            "No listing blocks on page"
                        );
                    }
                    listings.append(&mut extracted);
                }
                Err(e) => {
                    stats.pages_failed += 1;
                    error!(
                        page,
                        %url,
                        timeout = e.is_timeout(),
                        status = ?e.status(),
                        error = %e,
                        "Error scraping page"
                    );
                }
            }

            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
        }

        info!(
            pages = stats.pages_attempted,
            failed = stats.pages_failed,
            listings = listings.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Walk complete"
        );
        (listings, stats)
    }
}

/// Build the URL for one results page.
///
/// The `page` query pair is appended, so any filters already in `base` are
/// kept and a base without a query string gets one.
///
/// # Arguments
///
/// * `base` - The search results URL, with or without a query string
/// * `page` - The 1-based page number
///
/// # Returns
///
/// A new URL; `base` is left untouched.
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://cars.example/search?price_max=60000")?;
/// assert_eq!(page_url(&base, 2).as_str(), "https://cars.example/search?price_max=60000&page=2");
/// ```
pub fn page_url(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair(PAGE_PARAM, &page.to_string());
    url
}
