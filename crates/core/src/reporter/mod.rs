//! Reporting capability handed to the orchestrator and the worker pool.
//!
//! Core components never log through process-wide state of their own; they
//! call a [`Reporter`] they were given. The binary decides which reporters
//! to plug in (tracing, Prometheus, or several at once).

mod metrics;
mod logging;

pub use self::metrics::MetricsReporter;
pub use self::logging::TracingReporter;

use std::path::Path;
use std::sync::Arc;

use crate::converter::{ConversionJob, JobResult};
use crate::orchestrator::{OrchestratorError, Phase, PhaseReport, RunReport};

/// Receives progress events from a conversion run.
///
/// All methods have empty defaults so implementations pick what they need.
pub trait Reporter: Send + Sync {
    /// A run is about to scan `source_dir`.
    fn run_started(&self, _source_dir: &Path, _cache_dir: &Path) {}

    /// A phase is starting with `jobs` jobs to execute.
    fn phase_started(&self, _phase: Phase, _jobs: usize) {}

    /// A worker picked up a job.
    fn job_started(&self, _job: &ConversionJob) {}

    /// A job (or skip) produced its result.
    fn job_finished(&self, _phase: Phase, _result: &JobResult) {}

    /// Every job of the phase has reported.
    fn phase_finished(&self, _report: &PhaseReport) {}

    /// All phases finished.
    fn run_finished(&self, _report: &RunReport) {}

    /// A run that had started was aborted by a fatal error.
    fn run_failed(&self, _error: &OrchestratorError) {}
}

/// Reporter that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// Forwards every event to several reporters, in order.
#[derive(Clone, Default)]
pub struct Reporters {
    inner: Vec<Arc<dyn Reporter>>,
}

impl Reporters {
    /// Creates an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter.
    pub fn with(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.inner.push(reporter);
        self
    }
}

impl Reporter for Reporters {
    fn run_started(&self, source_dir: &Path, cache_dir: &Path) {
        for r in &self.inner {
            r.run_started(source_dir, cache_dir);
        }
    }

    fn phase_started(&self, phase: Phase, jobs: usize) {
        for r in &self.inner {
            r.phase_started(phase, jobs);
        }
    }

    fn job_started(&self, job: &ConversionJob) {
        for r in &self.inner {
            r.job_started(job);
        }
    }

    fn job_finished(&self, phase: Phase, result: &JobResult) {
        for r in &self.inner {
            r.job_finished(phase, result);
        }
    }

    fn phase_finished(&self, report: &PhaseReport) {
        for r in &self.inner {
            r.phase_finished(report);
        }
    }

    fn run_finished(&self, report: &RunReport) {
        for r in &self.inner {
            r.run_finished(report);
        }
    }

    fn run_failed(&self, error: &OrchestratorError) {
        for r in &self.inner {
            r.run_failed(error);
        }
    }
}
