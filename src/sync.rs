// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! Background persistence queue.
//!
//! Handlers respond as soon as a summary or profile exists in memory; the
//! durable write happens here, asynchronously. Delivery is at-least-once:
//! each job is retried a bounded number of times and exhaustion is logged
//! as an error, never swallowed. Sinks are upserts keyed by id, so a replay
//! resolves to last-write-wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::{Summary, UserProfile};
use crate::store::SharedStore;

/// Queue depth. Senders await a free slot instead of dropping jobs.
const QUEUE_CAPACITY: usize = 256;

/// Attempts per job before it is reported as lost.
const MAX_ATTEMPTS: u32 = 3;

/// Pause between attempts.
const RETRY_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// A unit of deferred persistence work.
#[derive(Debug, Clone)]
pub enum SyncJob {
    RecordSummary(Summary),
    UpsertProfile(UserProfile),
}

impl SyncJob {
    fn describe(&self) -> &'static str {
        match self {
            SyncJob::RecordSummary(_) => "record_summary",
            SyncJob::UpsertProfile(_) => "upsert_profile",
        }
    }
}

/// Where queued jobs land.
#[async_trait]
pub trait SyncSink: Send + Sync {
    async fn record_summary(&self, summary: Summary) -> Result<(), SyncError>;
    async fn upsert_profile(&self, profile: UserProfile) -> Result<(), SyncError>;
}

#[async_trait]
impl SyncSink for SharedStore {
    async fn record_summary(&self, summary: Summary) -> Result<(), SyncError> {
        self.write().await.upsert_summary(summary);
        Ok(())
    }

    async fn upsert_profile(&self, profile: UserProfile) -> Result<(), SyncError> {
        self.write().await.upsert_profile(profile);
        Ok(())
    }
}

/// Cloneable handle for enqueuing jobs from request handlers.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncJob>,
}

impl SyncHandle {
    /// Enqueue a job, waiting for queue space if necessary.
    pub async fn enqueue(&self, job: SyncJob) {
        if self.tx.send(job).await.is_err() {
            tracing::error!("sync worker gone, job dropped");
        }
    }
}

/// Start the worker. Returns the handle handlers enqueue through and the
/// worker task, which exits after draining once `cancel` fires.
pub fn spawn(sink: Arc<dyn SyncSink>, cancel: CancellationToken) -> (SyncHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let worker = tokio::spawn(run(sink, rx, cancel));
    (SyncHandle { tx }, worker)
}

async fn run(sink: Arc<dyn SyncSink>, mut rx: mpsc::Receiver<SyncJob>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => apply_with_retry(sink.as_ref(), job).await,
                None => return,
            },
        }
    }

    // Drain jobs already queued before shutting down.
    while let Ok(job) = rx.try_recv() {
        apply_with_retry(sink.as_ref(), job).await;
    }
}

async fn apply_with_retry(sink: &dyn SyncSink, job: SyncJob) {
    let kind = job.describe();
    for attempt in 1..=MAX_ATTEMPTS {
        match apply(sink, job.clone()).await {
            Ok(()) => return,
            Err(err) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(kind, attempt, error = %err, "sync job failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                tracing::error!(kind, error = %err, "sync job lost after {MAX_ATTEMPTS} attempts");
            }
        }
    }
}

async fn apply(sink: &dyn SyncSink, job: SyncJob) -> Result<(), SyncError> {
    match job {
        SyncJob::RecordSummary(summary) => sink.record_summary(summary).await,
        SyncJob::UpsertProfile(profile) => sink.upsert_profile(profile).await,
    }
}

#[cfg(test)]
pub(crate) fn test_handle() -> (SyncHandle, mpsc::Receiver<SyncJob>) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    (SyncHandle { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummarySource;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Mutex;

    /// Sink that fails a configured number of times before accepting.
    struct FlakySink {
        failures_left: AtomicU32,
        attempts: AtomicU32,
        accepted: Mutex<Vec<String>>,
    }

    impl FlakySink {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                attempts: AtomicU32::new(0),
                accepted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SyncSink for FlakySink {
        async fn record_summary(&self, summary: Summary) -> Result<(), SyncError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(SyncError::Unavailable("simulated outage".into()));
            }
            self.accepted.lock().await.push(summary.id);
            Ok(())
        }

        async fn upsert_profile(&self, _: UserProfile) -> Result<(), SyncError> {
            Ok(())
        }
    }

    fn summary(id: &str) -> Summary {
        Summary {
            id: id.to_string(),
            user_id: "user_1".to_string(),
            source: SummarySource::Text,
            markdown: "## Summary".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn jobs_land_in_the_sink() {
        let store = crate::store::shared();
        let cancel = CancellationToken::new();
        let sink: Arc<dyn SyncSink> = Arc::new(store.clone());
        let (handle, worker) = spawn(sink, cancel.clone());

        handle.enqueue(SyncJob::RecordSummary(summary("a"))).await;

        // Close the channel so the worker finishes once the job is applied.
        drop(handle);
        worker.await.unwrap();

        assert_eq!(store.read().await.list_summaries("user_1").len(), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let sink = Arc::new(FlakySink::new(2));
        let cancel = CancellationToken::new();
        let (handle, worker) = spawn(sink.clone(), cancel);

        handle.enqueue(SyncJob::RecordSummary(summary("a"))).await;
        drop(handle);
        worker.await.unwrap();

        assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(*sink.accepted.lock().await, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn exhausted_jobs_stop_retrying() {
        let sink = Arc::new(FlakySink::new(u32::MAX));
        let cancel = CancellationToken::new();
        let (handle, worker) = spawn(sink.clone(), cancel);

        handle.enqueue(SyncJob::RecordSummary(summary("a"))).await;
        drop(handle);
        worker.await.unwrap();

        assert_eq!(sink.attempts.load(Ordering::SeqCst), MAX_ATTEMPTS);
        assert!(sink.accepted.lock().await.is_empty());
    }

    #[tokio::test]
    async fn cancellation_drains_queued_jobs() {
        let store = crate::store::shared();
        let cancel = CancellationToken::new();
        let sink: Arc<dyn SyncSink> = Arc::new(store.clone());
        let (handle, worker) = spawn(sink, cancel.clone());

        handle.enqueue(SyncJob::RecordSummary(summary("a"))).await;
        handle.enqueue(SyncJob::RecordSummary(summary("b"))).await;
        cancel.cancel();
        worker.await.unwrap();

        assert_eq!(store.read().await.list_summaries("user_1").len(), 2);
    }
}
