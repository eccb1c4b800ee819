//! Fake tool runner for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ToolCommand, ToolError, ToolOutput, ToolRunner};

/// Fake implementation of the ToolRunner trait.
///
/// Behaves like a well-formed encoder unless told otherwise:
/// - Writes a small file at the output path and exits 0
/// - Fails with a given stderr for chosen input files
/// - Panics for chosen input files
/// - Sleeps per input file to control completion order
/// - Records every command and the peak number of concurrent runs
///
/// Behavior is keyed by the input file name (`clip.MOV`), which is the
/// argument after `-i`, or the first argument for tools without `-i`.
///
/// # Example
///
/// ```rust,ignore
/// use reelcache_core::testing::FakeToolRunner;
///
/// let runner = FakeToolRunner::new();
/// runner.fail_on("broken.MOV", "moov atom not found").await;
///
/// let orchestrator = Orchestrator::new(config, commands, Arc::new(runner.clone()), reporter);
/// orchestrator.run_all(&dir).await?;
///
/// assert_eq!(runner.invocation_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeToolRunner {
    /// Every command received, in arrival order.
    invocations: Arc<RwLock<Vec<ToolCommand>>>,
    /// Input file name -> stderr to fail with.
    failures: Arc<RwLock<HashMap<String, String>>>,
    /// Input file names that make the runner panic.
    panics: Arc<RwLock<HashSet<String>>>,
    /// Input file name -> simulated run time.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Run time for inputs without their own delay.
    default_delay: Arc<RwLock<Duration>>,
    /// Programs reported as not installed.
    missing: Arc<RwLock<HashSet<PathBuf>>>,
    /// Whether successful runs create their output file.
    skip_outputs: Arc<RwLock<bool>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeToolRunner {
    /// Create a new fake runner where every tool succeeds instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail runs whose input is `file_name`, with `stderr` as diagnostics.
    pub async fn fail_on(&self, file_name: impl Into<String>, stderr: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(file_name.into(), stderr.into());
    }

    /// Panic inside `run` when the input is `file_name`.
    pub async fn panic_on(&self, file_name: impl Into<String>) {
        self.panics.write().await.insert(file_name.into());
    }

    /// Set the simulated run time for one input.
    pub async fn set_delay(&self, file_name: impl Into<String>, delay: Duration) {
        self.delays.write().await.insert(file_name.into(), delay);
    }

    /// Set the simulated run time for every other input.
    pub async fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.write().await = delay;
    }

    /// Report `program` as not installed.
    pub async fn missing_program(&self, program: impl AsRef<Path>) {
        self.missing
            .write()
            .await
            .insert(program.as_ref().to_path_buf());
    }

    /// Enable or disable writing output files on success.
    pub async fn set_write_outputs(&self, write: bool) {
        *self.skip_outputs.write().await = !write;
    }

    /// Get all recorded commands.
    pub async fn invocations(&self) -> Vec<ToolCommand> {
        self.invocations.read().await.clone()
    }

    /// Get the number of commands run.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Get the input path of every recorded command.
    pub async fn inputs(&self) -> Vec<PathBuf> {
        self.invocations
            .read()
            .await
            .iter()
            .filter_map(input_of)
            .collect()
    }

    /// Highest number of runs observed in flight at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) -> ActiveGuard {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ActiveGuard(Arc::clone(&self.active))
    }
}

/// Decrements the in-flight count even when the run panics.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn input_of(command: &ToolCommand) -> Option<PathBuf> {
    let mut args = command.args.iter();
    let input = match args.position(|a| a == "-i") {
        Some(i) => command.args.get(i + 1),
        None => command.args.first(),
    };
    input.map(PathBuf::from)
}

fn output_of(command: &ToolCommand) -> Option<PathBuf> {
    command.args.last().map(PathBuf::from)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl ToolRunner for FakeToolRunner {
    fn name(&self) -> &str {
        "fake"
    }

    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
        if self.missing.read().await.contains(&command.program) {
            return Err(ToolError::NotFound {
                program: command.program.clone(),
            });
        }

        self.invocations.write().await.push(command.clone());
        let _guard = self.enter();

        let input = input_of(command).map(|p| file_name(&p)).unwrap_or_default();

        let delay = match self.delays.read().await.get(&input) {
            Some(delay) => *delay,
            None => *self.default_delay.read().await,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.panics.read().await.contains(&input) {
            panic!("fake tool crashed on {}", input);
        }

        if let Some(stderr) = self.failures.read().await.get(&input) {
            return Ok(ToolOutput {
                exit_code: Some(1),
                stderr: stderr.clone(),
            });
        }

        if !*self.skip_outputs.read().await {
            if let Some(output) = output_of(command) {
                if let Err(e) = tokio::fs::write(&output, b"fake artifact").await {
                    return Ok(ToolOutput {
                        exit_code: Some(1),
                        stderr: format!("{}: {}", output.display(), e),
                    });
                }
            }
        }

        Ok(ToolOutput {
            exit_code: Some(0),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ffmpeg(input: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(input.to_string_lossy())
            .arg(output.to_string_lossy())
    }

    #[tokio::test]
    async fn test_success_writes_output() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        let out = dir.path().join("a.mp4");

        let output = runner
            .run(&ffmpeg(&dir.path().join("a.MOV"), &out))
            .await
            .unwrap();

        assert!(output.success());
        assert!(out.is_file());
        assert_eq!(runner.inputs().await, vec![dir.path().join("a.MOV")]);
    }

    #[tokio::test]
    async fn test_input_without_flag_is_first_arg() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        runner.fail_on("a.heic", "no decode delegate").await;

        let command = ToolCommand::new("magick")
            .arg(dir.path().join("a.heic").to_string_lossy())
            .arg(dir.path().join("a.jpg").to_string_lossy());
        let output = runner.run(&command).await.unwrap();

        assert_eq!(output.exit_code, Some(1));
        assert_eq!(output.stderr, "no decode delegate");
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = FakeToolRunner::new();
        runner.missing_program("ffmpeg").await;

        let err = runner
            .run(&ffmpeg(Path::new("a.MOV"), Path::new("a.mp4")))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
        assert_eq!(runner.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_outputs_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        runner.set_write_outputs(false).await;

        let out = dir.path().join("a.mp4");
        runner
            .run(&ffmpeg(&dir.path().join("a.MOV"), &out))
            .await
            .unwrap();
        assert!(!out.exists());
    }
}
