//! Persisted outputs for normalized listings.
//!
//! # Submodules
//!
//! - [`csv`]: the primary table, UTF-8 with BOM, fixed [`COLUMNS`](crate::models::COLUMNS) header
//! - [`json`]: optional export of the same rows as an array of objects
//!
//! Both render the whole document in memory, write it to a sibling temporary
//! file and rename that over the destination. A failed write leaves the
//! destination untouched.

pub mod csv;
pub mod json;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Replace `path` with `bytes`, or leave it as it was.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SinkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let tmp = tmp_path(path);
    debug!(tmp = %tmp.display(), bytes = bytes.len(), "Writing temporary file");

    if let Err(e) = fs::write(&tmp, bytes).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        warn!(tmp = %tmp.display(), error = %e, "Rename failed; removing temporary file");
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
