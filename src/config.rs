//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags. The merged result is validated once into a
//! [`ScrapeConfig`] before any request is made.
//!
//! ```yaml
//! base_url: "https://www.sparkauto.tn/search-listing-result?listing_price_max=60000"
//! max_pages: 8
//! delay_secs: 2
//! output: out/car_listings.csv
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.sparkauto.tn/search-listing-result?_token=7qsMKlo8lUhwljXZuE3HBEoNTxz09039s95qQ76P&listing_min_model_year=2%E2%80%AF010&listing_max_model_year=2%E2%80%AF023&listing_price_min=28%E2%80%AF000&listing_price_max=460%E2%80%AF000&listing_mileage_min=11%E2%80%AF500&listing_mileage_max=228%E2%80%AF000";
pub const DEFAULT_MAX_PAGES: u32 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DELAY_SECS: u64 = 1;
pub const DEFAULT_OUTPUT: &str = "car_listings.csv";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("base URL must be http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("max_pages must be at least 1")]
    InvalidMaxPages,

    #[error("timeout_secs must be at least 1")]
    InvalidTimeout,
}

/// Config file contents. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub max_pages: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub delay_secs: Option<u64>,
    pub output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let file = Self::from_yaml(&text, path)?;
        info!("Loaded configuration file");
        Ok(file)
    }
}

/// Validated parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub max_pages: u32,
    pub timeout: Duration,
    pub delay: Duration,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
    pub user_agent: String,
}

impl ScrapeConfig {
    /// Merge CLI flags over file values over defaults, then validate.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let base_url = cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let max_pages = cli.max_pages.or(file.max_pages).unwrap_or(DEFAULT_MAX_PAGES);
        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let delay_secs = cli.delay_secs.or(file.delay_secs).unwrap_or(DEFAULT_DELAY_SECS);

        let config = Self {
            base_url: parse_base_url(&base_url)?,
            max_pages,
            timeout: Duration::from_secs(timeout_secs),
            delay: Duration::from_secs(delay_secs),
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            json_output: cli.json_output.clone().or(file.json_output),
            user_agent: file
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };
        if config.max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages);
        }
        if config.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Load the file named by `--config` (if any) and resolve against the CLI.
    pub async fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path).await?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
