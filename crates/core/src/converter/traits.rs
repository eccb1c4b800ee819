//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ToolError;
use super::types::{ToolCommand, ToolOutput};

/// Runs external tools.
///
/// The real implementation spawns processes; tests substitute a fake that
/// succeeds or fails on demand without any encoder installed.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Runs `command` to completion and reports its exit status.
    ///
    /// A non-zero exit is `Ok`; only failures to launch or wait are `Err`.
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError>;

    /// Checks that `program` can be launched.
    async fn validate(&self, _program: &Path) -> Result<(), ToolError> {
        Ok(())
    }
}
