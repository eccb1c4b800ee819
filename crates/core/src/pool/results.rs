//! Completion-ordered result stream.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::converter::JobResult;

/// Results of one batch, yielded as jobs finish.
///
/// Order is completion order, not submission order. The stream ends after
/// exactly one result per submitted job.
#[derive(Debug)]
pub struct JobResults {
    rx: mpsc::Receiver<JobResult>,
    remaining: usize,
}

impl JobResults {
    pub(crate) fn new(rx: mpsc::Receiver<JobResult>, total: usize) -> Self {
        Self {
            rx,
            remaining: total,
        }
    }

    /// Number of results not yet received.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Waits for the next finished job.
    pub async fn next_result(&mut self) -> Option<JobResult> {
        let result = self.rx.recv().await;
        if result.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        result
    }

    /// Waits for every job and returns the results in completion order.
    pub async fn collect_all(mut self) -> Vec<JobResult> {
        let mut results = Vec::with_capacity(self.remaining);
        while let Some(result) = self.next_result().await {
            results.push(result);
        }
        results
    }
}

impl Stream for JobResults {
    type Item = JobResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<JobResult>> {
        let poll = self.rx.poll_recv(cx);
        if let Poll::Ready(Some(_)) = &poll {
            self.remaining = self.remaining.saturating_sub(1);
        }
        poll
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::JobKind;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_stream_counts_down() {
        let (tx, rx) = mpsc::channel(4);
        let mut results = JobResults::new(rx, 2);

        tx.send(JobResult::skipped("a.MOV", JobKind::VideoTranscode, "already cached"))
            .await
            .unwrap();
        tx.send(JobResult::skipped("b.MOV", JobKind::VideoTranscode, "already cached"))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(results.size_hint(), (2, Some(2)));
        let first = results.next().await.unwrap();
        assert_eq!(first.source_name, "a.MOV");
        assert_eq!(results.remaining(), 1);

        let rest = results.collect_all().await;
        assert_eq!(rest.len(), 1);
    }
}
