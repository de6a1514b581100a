//! InMemoryTaskQueue - FIFO queue for development and tests
//!
//! # 学習ポイント
//! - tokio Mutex + Notify による待機付き pop
//! - `Notified::enable()` で通知の取りこぼしを防ぐ
//! - in-flight カウントで「キューが空 かつ 実行中なし」= idle を判定

use async_trait::async_trait;
use std::collections::VecDeque;
use std::pin::pin;
use tokio::sync::{Mutex, Notify};

use crate::domain::{Job, TaskIdentifier};
use crate::error::QueueError;
use crate::ports::TaskQueue;

/// A job waiting to be picked up by the task type `identifier`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedJob {
    pub identifier: TaskIdentifier,
    pub job: Job,
}

#[derive(Default)]
struct QueueState {
    items: VecDeque<QueuedJob>,
    /// Popped but not yet completed.
    in_flight: usize,
    closed: bool,
}

impl QueueState {
    fn is_idle(&self) -> bool {
        self.items.is_empty() && self.in_flight == 0
    }
}

/// Unbounded FIFO queue.
///
/// Every successful [`pop`](Self::pop) must be paired with a
/// [`complete`](Self::complete) once the job has been handled, so that
/// [`wait_idle`](Self::wait_idle) can tell when the whole chain has drained.
#[derive(Default)]
pub struct InMemoryTaskQueue {
    state: Mutex<QueueState>,
    /// Wakes poppers on push and close.
    available: Notify,
    /// Wakes `wait_idle` callers.
    idle: Notify,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next job. Returns `None` once the queue is closed and empty.
    pub async fn pop(&self) -> Option<QueuedJob> {
        loop {
            let mut notified = pin!(self.available.notified());
            notified.as_mut().enable();
            {
                let mut state = self.state.lock().await;
                if let Some(item) = state.items.pop_front() {
                    state.in_flight += 1;
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Mark one popped job as handled.
    pub async fn complete(&self) {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.is_idle() {
            self.idle.notify_waiters();
        }
    }

    /// Wait until nothing is queued and nothing is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let mut notified = pin!(self.idle.notified());
            notified.as_mut().enable();
            if self.state.lock().await.is_idle() {
                return;
            }
            notified.await;
        }
    }

    /// Refuse new jobs and wake every waiting `pop`.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
        self.available.notify_waiters();
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.items.is_empty()
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, identifier: &TaskIdentifier, job: Job) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(QueueError::Closed);
        }
        state.items.push_back(QueuedJob {
            identifier: identifier.clone(),
            job,
        });
        self.available.notify_one();
        Ok(())
    }
}
