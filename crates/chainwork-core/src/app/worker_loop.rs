use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

use super::dispatcher::{Dispatcher, ExecutionReport};
use crate::domain::TaskIdentifier;
use crate::error::DispatchError;
use crate::impls::InMemoryTaskQueue;

/// Outcome of one job handled by a worker.
#[derive(Debug)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub identifier: TaskIdentifier,
    pub result: Result<ExecutionReport, DispatchError>,
}

/// Worker group handle.
/// - `request_shutdown()` でワーカー全体が新しいジョブを取らなくなる
/// - `shutdown_and_join()` で全ワーカーの終了を待てる
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn `n` workers draining `queue` through `dispatcher`.
    ///
    /// Every handled job produces one [`WorkerReport`] on the returned channel.
    pub fn spawn(
        n: usize,
        queue: Arc<InMemoryTaskQueue>,
        dispatcher: Arc<Dispatcher>,
    ) -> (Self, mpsc::UnboundedReceiver<WorkerReport>) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (report_tx, report_rx) = mpsc::unbounded_channel();

        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let q = Arc::clone(&queue);
            let d = Arc::clone(&dispatcher);
            let tx = report_tx.clone();
            let mut rx = shutdown_rx.clone();

            let join = tokio::spawn(async move {
                worker_loop(worker_id, q, d, tx, &mut rx).await;
            });
            joins.push(join);
        }

        (Self { shutdown_tx, joins }, report_rx)
    }

    /// Request shutdown for all workers.
    /// In-flight executions run to completion; no new jobs are taken.
    pub fn request_shutdown(&self) {
        // receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for all workers.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for j in self.joins {
            if let Err(e) = j.await {
                error!(error = %e, "worker task panicked");
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<InMemoryTaskQueue>,
    dispatcher: Arc<Dispatcher>,
    reports: mpsc::UnboundedSender<WorkerReport>,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // pop は待つ可能性があるので shutdown と競合させる
        let queued = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            queued = queue.pop() => queued,
        };

        let Some(queued) = queued else {
            // closed and drained
            break;
        };

        debug!(worker_id, task = %queued.identifier, "picked up job");
        // own task per job: a panicking hook must not skip `complete()`
        let handle = tokio::spawn({
            let dispatcher = Arc::clone(&dispatcher);
            let identifier = queued.identifier.clone();
            let job = queued.job;
            async move { dispatcher.dispatch(&identifier, job).await }
        });
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(DispatchError::Panicked {
                identifier: queued.identifier.clone(),
                reason: panic_reason(e),
            }),
        };
        if let Err(e) = &result {
            error!(worker_id, task = %queued.identifier, error = %e, "dispatch failed");
        }

        // receiver may already be dropped
        let _ = reports.send(WorkerReport {
            worker_id,
            identifier: queued.identifier,
            result,
        });

        // chained job is already enqueued at this point, so idle never flickers
        queue.complete().await;
    }
    debug!(worker_id, "worker stopped");
}

fn panic_reason(e: JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
