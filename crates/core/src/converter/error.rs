//! Error types for the converter module.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while launching or waiting on an external tool.
///
/// A tool that runs and exits non-zero is not an error here; that is
/// reported through [`ToolOutput`](super::ToolOutput).
#[derive(Debug, Error)]
pub enum ToolError {
    /// Binary not found.
    #[error("Tool not found: {program}")]
    NotFound { program: PathBuf },

    /// Binary exists but cannot be executed.
    #[error("Permission denied launching {program}")]
    PermissionDenied { program: PathBuf },

    /// Any other launch failure.
    #[error("Failed to launch {program}: {source}")]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while the tool was running.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool did not finish within the configured limit.
    #[error("Tool timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl ToolError {
    /// Classifies an error returned by `spawn`.
    pub fn from_spawn(program: &Path, error: std::io::Error) -> Self {
        let program = program.to_path_buf();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { program },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { program },
            _ => Self::LaunchFailed {
                program,
                source: error,
            },
        }
    }

    /// Whether the tool never started.
    pub fn is_launch_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::PermissionDenied { .. } | Self::LaunchFailed { .. }
        )
    }
}
