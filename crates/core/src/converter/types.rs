//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::scanner::AssetClass;

/// Kind of artifact a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Legacy video container to H.264/AAC MP4.
    VideoTranscode,
    /// Legacy image container to JPEG.
    ImageTranscode,
    /// Single preview frame from a video, as JPEG.
    ThumbnailExtract,
}

impl JobKind {
    /// Extension of the produced artifact.
    pub fn target_extension(&self) -> &'static str {
        match self {
            Self::VideoTranscode => "mp4",
            Self::ImageTranscode | Self::ThumbnailExtract => "jpg",
        }
    }

    /// Which source files this kind of job consumes.
    pub fn source_class(&self) -> AssetClass {
        match self {
            Self::VideoTranscode => AssetClass::LegacyVideo,
            Self::ImageTranscode => AssetClass::LegacyImage,
            Self::ThumbnailExtract => AssetClass::ThumbnailSource,
        }
    }

    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VideoTranscode => "video_transcode",
            Self::ImageTranscode => "image_transcode",
            Self::ThumbnailExtract => "thumbnail_extract",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Binary to run (looked up on `PATH` when relative).
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Whether the tool's stderr is kept for diagnostics. Stdout is always
    /// discarded.
    pub capture_stderr: bool,
}

impl ToolCommand {
    /// Creates a command with no arguments that captures stderr.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture_stderr: true,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Discards the tool's stderr as well as its stdout.
    pub fn quiet(mut self) -> Self {
        self.capture_stderr = false;
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished tool process reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stderr (empty when not captured).
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the tool exited with code zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable reason for a failed run: the trimmed stderr, or the
    /// exit status when stderr is empty.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// One unit of conversion work.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Source file.
    pub source_path: PathBuf,
    /// Source file name, used to label the result.
    pub source_name: String,
    /// Artifact to produce.
    pub target_path: PathBuf,
    /// What kind of artifact.
    pub kind: JobKind,
    /// How to produce it.
    pub command: ToolCommand,
}

/// Outcome of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    /// Nothing to do; the artifact (or an original still) already exists.
    Skipped,
    /// The tool exited with code zero.
    Succeeded,
    /// The tool could not be launched or exited non-zero.
    Failed,
}

impl JobOutcome {
    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Result of one job, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Source file name.
    pub source_name: String,
    /// Kind of job.
    pub kind: JobKind,
    /// What happened.
    pub outcome: JobOutcome,
    /// Skip reason, or diagnostics for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Wall time spent in the tool.
    pub elapsed_ms: u64,
}

impl JobResult {
    /// A job that never ran.
    pub fn skipped(source_name: impl Into<String>, kind: JobKind, reason: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            kind,
            outcome: JobOutcome::Skipped,
            detail: Some(reason.into()),
            elapsed_ms: 0,
        }
    }

    /// A job whose tool exited successfully.
    pub fn succeeded(job: &ConversionJob, elapsed: Duration) -> Self {
        Self {
            source_name: job.source_name.clone(),
            kind: job.kind,
            outcome: JobOutcome::Succeeded,
            detail: None,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// A job that failed, with diagnostics.
    pub fn failed(job: &ConversionJob, detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            source_name: job.source_name.clone(),
            kind: job.kind,
            outcome: JobOutcome::Failed,
            detail: Some(detail.into()),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.source_name, self.outcome.as_str())?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}
