//! Scanner module for enumerating source media.
//!
//! Lists the regular files of a source directory whose extension belongs to
//! an [`AssetClass`]. Listing is read-only and not recursive; an empty result
//! is a valid answer.

mod error;
mod types;

pub use error::ScanError;
pub use types::{AssetClass, ExtensionPattern, MediaAsset};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Canonicalizes a source directory, failing if it is missing or not a
/// directory.
pub async fn resolve_source_dir(dir: &Path) -> Result<PathBuf, ScanError> {
    let resolved = tokio::fs::canonicalize(dir)
        .await
        .map_err(|e| ScanError::from_io(dir, e))?;

    let meta = tokio::fs::metadata(&resolved)
        .await
        .map_err(|e| ScanError::from_io(&resolved, e))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory { path: resolved });
    }

    Ok(resolved)
}

/// Lists the files in `dir` that belong to `class`.
///
/// Order follows the filesystem and must not be relied upon.
pub async fn scan(dir: &Path, class: AssetClass) -> Result<Vec<MediaAsset>, ScanError> {
    scan_any(dir, &[class]).await
}

/// Lists the files in `dir` that belong to any of `classes`.
pub async fn scan_any(dir: &Path, classes: &[AssetClass]) -> Result<Vec<MediaAsset>, ScanError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ScanError::from_io(dir, e))?;

    let mut assets = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ScanError::from_io(dir, e))?
    {
        let path = entry.path();

        let Some(asset) = MediaAsset::from_path(&path) else {
            continue;
        };
        if !classes.iter().any(|c| c.matches(&asset.source_extension)) {
            continue;
        }

        // Follows symlinks; dangling links and directories are skipped.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => assets.push(asset),
            Ok(_) => debug!("Skipping non-file entry {:?}", path),
            Err(e) => debug!("Skipping unreadable entry {:?}: {}", path, e),
        }
    }

    Ok(assets)
}

/// Returns the base names of every file in `dir` belonging to `classes`.
pub async fn base_names(dir: &Path, classes: &[AssetClass]) -> Result<HashSet<String>, ScanError> {
    Ok(scan_any(dir, classes)
        .await?
        .into_iter()
        .map(|a| a.base_name)
        .collect())
}
