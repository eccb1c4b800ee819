//! Error types for the cache module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing the cache directory.
#[derive(Debug, Error)]
pub enum CacheDirError {
    /// The directory could not be created.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Something other than a directory occupies the cache path.
    #[error("Cache path exists but is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
