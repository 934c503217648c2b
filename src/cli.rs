//! Command-line interface definitions.
//!
//! Every flag is optional: unset flags fall back to the YAML config file (if
//! one is given) and then to the built-in defaults in [`crate::config`].

use clap::Parser;
use std::path::PathBuf;

/// Scrape a paginated car-listing search into a CSV table.
///
/// # Examples
///
/// ```sh
/// # Defaults: 5 pages of the built-in search, written to car_listings.csv
/// car_listings
///
/// # Custom search, 10 pages, CSV + JSON
/// car_listings --base-url "https://www.sparkauto.tn/search-listing-result?listing_price_max=60000" \
///     --max-pages 10 -o out/cars.csv --json-output out/cars.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search results URL; `page=<n>` is appended for each page
    #[arg(long, env = "LISTINGS_BASE_URL")]
    pub base_url: Option<String>,

    /// Number of result pages to visit
    #[arg(long, env = "LISTINGS_MAX_PAGES")]
    pub max_pages: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Pause between pages in seconds
    #[arg(long)]
    pub delay_secs: Option<u64>,

    /// CSV output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional JSON export path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_are_unset() {
        let cli = Cli::parse_from(["car_listings"]);
        assert!(cli.max_pages.is_none());
        assert!(cli.output.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "car_listings",
            "--base-url",
            "https://cars.example/search?x=1",
            "--max-pages",
            "3",
            "--delay-secs",
            "0",
            "-o",
            "/tmp/cars.csv",
            "--json-output",
            "/tmp/cars.json",
        ]);

        assert_eq!(cli.base_url.as_deref(), Some("https://cars.example/search?x=1"));
        assert_eq!(cli.max_pages, Some(3));
        assert_eq!(cli.delay_secs, Some(0));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/cars.csv")));
        assert_eq!(cli.json_output, Some(PathBuf::from("/tmp/cars.json")));
    }
}
