//! Reporter that emits `tracing` events.

use std::path::Path;
use tracing::{debug, error, info, warn};

use super::Reporter;
use crate::converter::{ConversionJob, JobOutcome, JobResult};
use crate::orchestrator::{OrchestratorError, Phase, PhaseReport, RunReport};

/// Logs run progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn run_started(&self, source_dir: &Path, cache_dir: &Path) {
        info!("Starting conversion in {:?} (cache: {:?})", source_dir, cache_dir);
    }

    fn phase_started(&self, phase: Phase, jobs: usize) {
        if jobs == 0 {
            debug!(phase = %phase, "Nothing to convert");
        } else {
            info!(phase = %phase, jobs, "Phase started");
        }
    }

    fn job_started(&self, job: &ConversionJob) {
        debug!(kind = %job.kind, "Converting {} -> {:?}", job.source_name, job.target_path);
    }

    fn job_finished(&self, phase: Phase, result: &JobResult) {
        match result.outcome {
            JobOutcome::Succeeded => info!(
                phase = %phase,
                elapsed_ms = result.elapsed_ms,
                "Converted {}",
                result.source_name
            ),
            JobOutcome::Skipped => debug!(
                phase = %phase,
                "Skipped {}: {}",
                result.source_name,
                result.detail.as_deref().unwrap_or("")
            ),
            JobOutcome::Failed => error!(
                phase = %phase,
                "Failed to convert {}\n{}",
                result.source_name,
                result.detail.as_deref().unwrap_or("")
            ),
        }
    }

    fn phase_finished(&self, report: &PhaseReport) {
        if report.failed() > 0 {
            warn!(
                phase = %report.phase,
                succeeded = report.succeeded(),
                skipped = report.skipped(),
                failed = report.failed(),
                "Phase finished with failures"
            );
        } else {
            info!(
                phase = %report.phase,
                succeeded = report.succeeded(),
                skipped = report.skipped(),
                elapsed_ms = report.elapsed_ms,
                "Phase finished"
            );
        }
    }

    fn run_finished(&self, report: &RunReport) {
        info!(
            succeeded = report.succeeded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "All conversions completed"
        );
    }

    fn run_failed(&self, error: &OrchestratorError) {
        error!("Conversion run aborted: {}", error);
    }
}
