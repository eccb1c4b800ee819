//! Turns tool runs into job results.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::traits::ToolRunner;
use super::types::{ConversionJob, JobResult};

/// Executes conversion jobs through a [`ToolRunner`].
///
/// Every outcome, including a missing binary, becomes a [`JobResult`];
/// nothing escapes as an error.
#[derive(Clone)]
pub struct ToolInvoker {
    runner: Arc<dyn ToolRunner>,
}

impl ToolInvoker {
    /// Creates an invoker over `runner`.
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// Runs the job's command and classifies the outcome.
    pub async fn invoke(&self, job: &ConversionJob) -> JobResult {
        let start = Instant::now();

        match self.runner.run(&job.command).await {
            Ok(output) if output.success() => {
                debug!("{} {:?} -> {:?}", job.kind, job.source_path, job.target_path);
                JobResult::succeeded(job, start.elapsed())
            }
            Ok(output) => JobResult::failed(job, output.failure_detail(), start.elapsed()),
            Err(e) => {
                warn!("Could not run tool for {}: {}", job.source_name, e);
                JobResult::failed(job, e.to_string(), start.elapsed())
            }
        }
    }
}
