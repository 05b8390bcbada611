//! Discovery of service configuration files.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::CONFIG_FILE_NAME;
use crate::error::{Result, UmbrellaError};

/// Finds every `configuration.yml` under `root`, at any depth.
///
/// Entries are visited in file-name order at each directory level, so the
/// result is the same on every platform and every run.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or cannot be traversed.
pub fn find_service_configs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(UmbrellaError::ServicesDirNotFound {
            path: root.to_path_buf(),
        }
        .into());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry.map_err(|e| UmbrellaError::DiscoveryFailed {
            message: e.to_string(),
        })?;

        if entry.file_type().is_file() && entry.file_name() == CONFIG_FILE_NAME {
            debug!("Discovered service configuration: {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
