//! Prometheus metrics for conversion runs.

use std::path::Path;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use super::Reporter;
use crate::converter::{JobOutcome, JobResult};
use crate::orchestrator::{OrchestratorError, Phase, RunReport};

/// Records job outcomes and durations into its own registry.
#[derive(Clone)]
pub struct MetricsReporter {
    registry: Registry,
    jobs_total: IntCounterVec,
    job_duration: HistogramVec,
    runs_total: IntCounter,
    run_in_progress: IntGauge,
}

impl MetricsReporter {
    /// Creates the collectors and registers them in a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let jobs_total = IntCounterVec::new(
            Opts::new("reelcache_jobs_total", "Conversion jobs by phase and outcome"),
            &["phase", "outcome"],
        )?;
        let job_duration = HistogramVec::new(
            HistogramOpts::new(
                "reelcache_job_duration_seconds",
                "Duration of executed conversion jobs",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
            &["phase"],
        )?;
        let runs_total = IntCounter::new("reelcache_runs_total", "Completed conversion runs")?;
        let run_in_progress = IntGauge::new(
            "reelcache_run_in_progress",
            "Whether a conversion run is in progress (1) or idle (0)",
        )?;

        let registry = Registry::new();
        registry.register(Box::new(jobs_total.clone()))?;
        registry.register(Box::new(job_duration.clone()))?;
        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(run_in_progress.clone()))?;

        Ok(Self {
            registry,
            jobs_total,
            job_duration,
            runs_total,
            run_in_progress,
        })
    }

    /// The registry holding this reporter's collectors.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Count recorded for a phase and outcome.
    pub fn job_count(&self, phase: Phase, outcome: JobOutcome) -> u64 {
        self.jobs_total
            .with_label_values(&[phase.as_str(), outcome.as_str()])
            .get()
    }
}

impl Reporter for MetricsReporter {
    fn run_started(&self, _source_dir: &Path, _cache_dir: &Path) {
        self.run_in_progress.set(1);
    }

    fn job_finished(&self, phase: Phase, result: &JobResult) {
        self.jobs_total
            .with_label_values(&[phase.as_str(), result.outcome.as_str()])
            .inc();
        if result.outcome != JobOutcome::Skipped {
            self.job_duration
                .with_label_values(&[phase.as_str()])
                .observe(result.elapsed_ms as f64 / 1000.0);
        }
    }

    fn run_finished(&self, _report: &RunReport) {
        self.runs_total.inc();
        self.run_in_progress.set(0);
    }

    fn run_failed(&self, _error: &OrchestratorError) {
        self.run_in_progress.set(0);
    }
}
