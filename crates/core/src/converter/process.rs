//! Tool runner that spawns real processes.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::error::ToolError;
use super::traits::ToolRunner;
use super::types::{ToolCommand, ToolOutput};

/// Runs tools as child processes and waits for them.
///
/// Without a timeout a tool that never exits holds its worker forever.
#[derive(Debug, Clone, Default)]
pub struct ProcessToolRunner {
    timeout: Option<Duration>,
}

impl ProcessToolRunner {
    /// Creates a runner without a timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner that kills tools running longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessToolRunner {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
        debug!("Running {}", command);

        let stderr = if command.capture_stderr {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolError::from_spawn(&command.program, e))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ToolError::Timeout {
                    timeout_secs: limit.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn validate(&self, program: &Path) -> Result<(), ToolError> {
        Command::new(program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| ToolError::from_spawn(program, e))?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand::new("sh").args(["-c", script])
    }

    #[tokio::test]
    async fn test_run_success() {
        let runner = ProcessToolRunner::new();
        let output = runner.run(&sh("exit 0")).await.unwrap();
        assert!(output.success());
    }

    #[tokio::test]
    async fn test_run_nonzero_captures_stderr() {
        let runner = ProcessToolRunner::new();
        let output = runner
            .run(&sh("echo 'Invalid data found' >&2; exit 1"))
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(1));
        assert_eq!(output.failure_detail(), "Invalid data found");
    }

    #[tokio::test]
    async fn test_quiet_discards_stderr() {
        let runner = ProcessToolRunner::new();
        let output = runner
            .run(&sh("echo noise >&2; exit 3").quiet())
            .await
            .unwrap();
        assert_eq!(output.stderr, "");
        assert_eq!(output.failure_detail(), "exited with code 3");
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let runner = ProcessToolRunner::new();
        let err = runner
            .run(&ToolCommand::new("/nonexistent/reelcache-tool"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_tool() {
        let runner = ProcessToolRunner::with_timeout(Some(Duration::from_millis(100)));
        let err = runner.run(&sh("sleep 5")).await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_validate_missing_binary() {
        let runner = ProcessToolRunner::new();
        let err = runner
            .validate(Path::new("/nonexistent/reelcache-tool"))
            .await
            .unwrap_err();
        assert!(err.is_launch_error());
    }
}
