//! Reporter that records events for assertions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::converter::{ConversionJob, JobOutcome, JobResult};
use crate::orchestrator::{OrchestratorError, Phase, PhaseReport, RunReport};
use crate::reporter::Reporter;

/// A reported event, reduced to what tests compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    RunStarted {
        source_dir: PathBuf,
        cache_dir: PathBuf,
    },
    PhaseStarted {
        phase: Phase,
        jobs: usize,
    },
    JobStarted {
        source_name: String,
    },
    JobFinished {
        phase: Phase,
        source_name: String,
        outcome: JobOutcome,
    },
    PhaseFinished {
        phase: Phase,
        results: usize,
    },
    RunFinished {
        succeeded: usize,
        failed: usize,
        skipped: usize,
    },
    RunFailed {
        error: String,
    },
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Get the finished jobs of one phase, in report order.
    pub fn finished(&self, phase: Phase) -> Vec<(String, JobOutcome)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::JobFinished {
                    phase: p,
                    source_name,
                    outcome,
                } if p == phase => Some((source_name, outcome)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Reporter for RecordingReporter {
    fn run_started(&self, source_dir: &Path, cache_dir: &Path) {
        self.push(ReportEvent::RunStarted {
            source_dir: source_dir.to_path_buf(),
            cache_dir: cache_dir.to_path_buf(),
        });
    }

    fn phase_started(&self, phase: Phase, jobs: usize) {
        self.push(ReportEvent::PhaseStarted { phase, jobs });
    }

    fn job_started(&self, job: &ConversionJob) {
        self.push(ReportEvent::JobStarted {
            source_name: job.source_name.clone(),
        });
    }

    fn job_finished(&self, phase: Phase, result: &JobResult) {
        self.push(ReportEvent::JobFinished {
            phase,
            source_name: result.source_name.clone(),
            outcome: result.outcome,
        });
    }

    fn phase_finished(&self, report: &PhaseReport) {
        self.push(ReportEvent::PhaseFinished {
            phase: report.phase,
            results: report.results.len(),
        });
    }

    fn run_finished(&self, report: &RunReport) {
        self.push(ReportEvent::RunFinished {
            succeeded: report.succeeded(),
            failed: report.failed(),
            skipped: report.skipped(),
        });
    }

    fn run_failed(&self, error: &OrchestratorError) {
        self.push(ReportEvent::RunFailed {
            error: error.to_string(),
        });
    }
}
