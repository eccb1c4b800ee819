//! Bounded worker pool implementation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error};

use crate::converter::{ConversionJob, JobOutcome, JobResult, ToolInvoker};
use crate::reporter::Reporter;

use super::results::JobResults;
use super::types::{PoolStats, PoolStatus};

type JobQueue = Arc<Mutex<mpsc::Receiver<ConversionJob>>>;

/// Runs batches of conversion jobs on a fixed number of workers.
///
/// Each batch gets its own queue and its own workers; the pool only keeps
/// counters between batches.
pub struct WorkerPool {
    invoker: ToolInvoker,
    reporter: Arc<dyn Reporter>,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Creates a pool executing jobs through `invoker`.
    pub fn new(invoker: ToolInvoker, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            invoker,
            reporter,
            stats: Arc::new(PoolStats::default()),
        }
    }

    /// Returns the current pool status.
    pub fn status(&self) -> PoolStatus {
        self.stats.to_status()
    }

    /// Starts `jobs` with at most `concurrency` running at once and returns
    /// their results as they complete.
    ///
    /// Must be called from within a tokio runtime. Jobs keep running if the
    /// returned stream is dropped.
    pub fn run(&self, jobs: Vec<ConversionJob>, concurrency: usize) -> JobResults {
        let total = jobs.len();
        let workers = concurrency.max(1).min(total.max(1));

        let (result_tx, result_rx) = mpsc::channel(total.max(1));
        if total == 0 {
            return JobResults::new(result_rx, 0);
        }

        debug!("Dispatching {} jobs to {} workers", total, workers);
        self.stats.enqueued(total);

        // Queue holds at most one pending job per worker; the feeder waits
        // for room.
        let (job_tx, job_rx) = mpsc::channel(workers);
        let queue: JobQueue = Arc::new(Mutex::new(job_rx));

        tokio::spawn(async move {
            for job in jobs {
                if job_tx.send(job).await.is_err() {
                    error!("Job queue closed before all jobs were dispatched");
                    break;
                }
            }
        });

        for id in 0..workers {
            tokio::spawn(worker_loop(
                id,
                Arc::clone(&queue),
                self.invoker.clone(),
                Arc::clone(&self.reporter),
                Arc::clone(&self.stats),
                result_tx.clone(),
            ));
        }

        JobResults::new(result_rx, total)
    }
}

async fn worker_loop(
    id: usize,
    queue: JobQueue,
    invoker: ToolInvoker,
    reporter: Arc<dyn Reporter>,
    stats: Arc<PoolStats>,
    results: mpsc::Sender<JobResult>,
) {
    loop {
        let next = {
            let mut rx = queue.lock().await;
            rx.recv().await
        };
        let Some(job) = next else {
            break;
        };

        stats.started();
        reporter.job_started(&job);

        let result = run_isolated(&invoker, job).await;

        stats.finished(result.outcome == JobOutcome::Failed);
        if results.send(result).await.is_err() {
            debug!("Worker {}: result receiver dropped", id);
        }
    }
    debug!("Worker {} exiting", id);
}

/// Runs one job on its own task so a panic in the runner becomes a failed
/// result instead of taking the worker down.
async fn run_isolated(invoker: &ToolInvoker, job: ConversionJob) -> JobResult {
    let invoker = invoker.clone();
    let task_job = job.clone();

    match tokio::spawn(async move { invoker.invoke(&task_job).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!("Job for {} aborted: {}", job.source_name, e);
            JobResult::failed(&job, format!("worker task aborted: {}", e), Duration::ZERO)
        }
    }
}
