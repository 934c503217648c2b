//! JSON export of normalized listings.
//!
//! Each row becomes an object keyed by the CSV column names, with `"N/A"` for
//! unknown values, so both files describe the same table.

use crate::models::Listing;
use crate::outputs::{SinkError, write_atomic};
use std::path::Path;
use tracing::{info, instrument};

/// Write listings to `path` as a pretty-printed JSON array.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = listings.len()))]
pub async fn write_listings(listings: &[Listing], path: &Path) -> Result<(), SinkError> {
    let json = serde_json::to_vec_pretty(listings)?;
    write_atomic(path, &json).await?;
    info!("Data saved to JSON");
    Ok(())
}
