//! Pool module for bounded-concurrency job execution.
//!
//! `WorkerPool::run` feeds a batch of jobs through a bounded queue to a fixed
//! set of worker tasks. Each worker holds one job for the whole lifetime of
//! its external process, so at most `concurrency` tools run at once. Results
//! come back over a channel in the order jobs finish.
//!
//! Every submitted job yields exactly one result. A job that fails, or whose
//! runner panics, is reported as failed and the other jobs carry on.
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let pool = WorkerPool::new(invoker, reporter);
//! let mut results = pool.run(jobs, 4);
//! while let Some(result) = results.next().await {
//!     println!("{}", result);
//! }
//! ```

mod results;
mod types;
mod worker;

pub use results::JobResults;
pub use types::PoolStatus;
pub use worker::WorkerPool;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use futures::StreamExt;
    use tempfile::TempDir;

    use crate::converter::{CommandBuilder, ConversionJob, JobKind, JobOutcome, ToolInvoker};
    use crate::reporter::NoopReporter;
    use crate::testing::FakeToolRunner;

    fn video_jobs(dir: &TempDir, names: &[&str]) -> Vec<ConversionJob> {
        let builder = CommandBuilder::default();
        names
            .iter()
            .map(|name| {
                let source_path = dir.path().join(format!("{}.MOV", name));
                let target_path = dir.path().join(format!("{}.mp4", name));
                ConversionJob {
                    command: builder.video_transcode(&source_path, &target_path),
                    source_name: format!("{}.MOV", name),
                    source_path,
                    target_path,
                    kind: JobKind::VideoTranscode,
                }
            })
            .collect()
    }

    fn pool(runner: &FakeToolRunner) -> WorkerPool {
        WorkerPool::new(
            ToolInvoker::new(Arc::new(runner.clone())),
            Arc::new(NoopReporter),
        )
    }

    #[tokio::test]
    async fn test_every_job_yields_one_result() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        let pool = pool(&runner);

        let results = pool
            .run(video_jobs(&dir, &["a", "b", "c", "d", "e"]), 2)
            .collect_all()
            .await;

        assert_eq!(results.len(), 5);
        let mut names: Vec<_> = results.iter().map(|r| r.source_name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a.MOV", "b.MOV", "c.MOV", "d.MOV", "e.MOV"]);
        assert!(results.iter().all(|r| r.outcome == JobOutcome::Succeeded));
        assert_eq!(pool.status().total_processed, 5);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let runner = FakeToolRunner::new();
        let results = pool(&runner).run(Vec::new(), 4);
        assert_eq!(results.remaining(), 0);
        assert!(results.collect_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        runner.set_default_delay(Duration::from_millis(40)).await;
        let pool = pool(&runner);

        let results = pool
            .run(video_jobs(&dir, &["1", "2", "3", "4", "5", "6", "7", "8"]), 3)
            .collect_all()
            .await;

        assert_eq!(results.len(), 8);
        assert!(runner.peak_concurrency() <= 3);
        assert!(runner.peak_concurrency() >= 2);
        assert!(pool.status().peak_active <= 3);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();

        let results = pool(&runner)
            .run(video_jobs(&dir, &["a", "b"]), 0)
            .collect_all()
            .await;
        assert_eq!(results.len(), 2);
        assert_eq!(runner.peak_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_fault_isolation() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        runner.fail_on("c.MOV", "Invalid data found when processing input").await;
        let pool = pool(&runner);

        let results = pool
            .run(video_jobs(&dir, &["a", "b", "c", "d"]), 2)
            .collect_all()
            .await;

        assert_eq!(results.len(), 4);
        let failed: Vec<_> = results
            .iter()
            .filter(|r| r.outcome == JobOutcome::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].source_name, "c.MOV");
        assert_eq!(
            failed[0].detail.as_deref(),
            Some("Invalid data found when processing input")
        );
        assert_eq!(pool.status().total_failed, 1);
    }

    #[tokio::test]
    async fn test_panicking_runner_is_isolated() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        runner.panic_on("b.MOV").await;

        let results = pool(&runner)
            .run(video_jobs(&dir, &["a", "b", "c"]), 1)
            .collect_all()
            .await;

        assert_eq!(results.len(), 3);
        let b = results.iter().find(|r| r.source_name == "b.MOV").unwrap();
        assert_eq!(b.outcome, JobOutcome::Failed);
        assert!(b.detail.as_deref().unwrap().contains("aborted"));
        assert_eq!(
            results
                .iter()
                .filter(|r| r.outcome == JobOutcome::Succeeded)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_completion_order() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();
        runner.set_delay("slow.MOV", Duration::from_millis(300)).await;
        runner.set_delay("fast.MOV", Duration::from_millis(10)).await;

        let mut results = pool(&runner).run(video_jobs(&dir, &["slow", "fast"]), 2);

        let first = results.next().await.unwrap();
        let second = results.next().await.unwrap();
        assert_eq!(first.source_name, "fast.MOV");
        assert_eq!(second.source_name, "slow.MOV");
        assert!(results.next().await.is_none());
    }

    #[tokio::test]
    async fn test_outputs_written() {
        let dir = TempDir::new().unwrap();
        let runner = FakeToolRunner::new();

        pool(&runner)
            .run(video_jobs(&dir, &["clip"]), 1)
            .collect_all()
            .await;

        assert!(dir.path().join("clip.mp4").is_file());
        assert_eq!(runner.invocation_count().await, 1);
    }
}
