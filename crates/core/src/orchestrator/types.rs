//! Orchestrator types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheDirError;
use crate::converter::{JobKind, JobOutcome, JobResult};
use crate::scanner::ScanError;

/// Conversion stage. Stages run strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Legacy image containers to JPEG.
    ImageConversion,
    /// Legacy video containers to MP4.
    VideoConversion,
    /// Preview frames for videos without a still image.
    ThumbnailDerivation,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 3] = [
        Phase::ImageConversion,
        Phase::VideoConversion,
        Phase::ThumbnailDerivation,
    ];

    /// The job kind this phase runs.
    pub fn job_kind(&self) -> JobKind {
        match self {
            Self::ImageConversion => JobKind::ImageTranscode,
            Self::VideoConversion => JobKind::VideoTranscode,
            Self::ThumbnailDerivation => JobKind::ThumbnailExtract,
        }
    }

    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImageConversion => "image_conversion",
            Self::VideoConversion => "video_conversion",
            Self::ThumbnailDerivation => "thumbnail_derivation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Results of one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Which phase.
    pub phase: Phase,
    /// Every result, skips first, then jobs in completion order.
    pub results: Vec<JobResult>,
    /// Wall time of the phase.
    pub elapsed_ms: u64,
}

impl PhaseReport {
    fn count(&self, outcome: JobOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Number of jobs that succeeded.
    pub fn succeeded(&self) -> usize {
        self.count(JobOutcome::Succeeded)
    }

    /// Number of jobs that failed.
    pub fn failed(&self) -> usize {
        self.count(JobOutcome::Failed)
    }

    /// Number of assets skipped.
    pub fn skipped(&self) -> usize {
        self.count(JobOutcome::Skipped)
    }
}

/// Results of a full run over one source directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Source directory that was scanned.
    pub source_dir: PathBuf,
    /// Cache directory artifacts were written to.
    pub cache_dir: PathBuf,
    /// When the run began.
    pub started_at: DateTime<Utc>,
    /// When the last phase finished.
    pub finished_at: DateTime<Utc>,
    /// One report per phase, in execution order.
    pub phases: Vec<PhaseReport>,
}

impl RunReport {
    /// Report for a given phase.
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// All results across phases.
    pub fn results(&self) -> impl Iterator<Item = &JobResult> {
        self.phases.iter().flat_map(|p| p.results.iter())
    }

    /// Total successful jobs.
    pub fn succeeded(&self) -> usize {
        self.phases.iter().map(PhaseReport::succeeded).sum()
    }

    /// Total failed jobs.
    pub fn failed(&self) -> usize {
        self.phases.iter().map(PhaseReport::failed).sum()
    }

    /// Total skipped assets.
    pub fn skipped(&self) -> usize {
        self.phases.iter().map(PhaseReport::skipped).sum()
    }
}

/// Fatal errors that stop a run before any job is attempted.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Source directory unreadable.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Cache directory could not be prepared.
    #[error(transparent)]
    CacheDir(#[from] CacheDirError),
}
