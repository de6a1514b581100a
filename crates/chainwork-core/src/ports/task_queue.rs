//! TaskQueue port - follow-up jobs are handed over here
//!
//! The engine only ever calls `enqueue`; storage, delivery order and retry
//! belong to the implementation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Job, TaskIdentifier};
use crate::error::QueueError;

/// Write-only queue capability used by the engine.
///
/// # Contract
/// - called zero or one times per `execute()`
/// - `identifier` is the routing key of the task that should pick `job` up
/// - must be safe to call from many executions concurrently
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, identifier: &TaskIdentifier, job: Job) -> Result<(), QueueError>;
}

#[async_trait]
impl<Q: TaskQueue + ?Sized> TaskQueue for Arc<Q> {
    async fn enqueue(&self, identifier: &TaskIdentifier, job: Job) -> Result<(), QueueError> {
        (**self).enqueue(identifier, job).await
    }
}
