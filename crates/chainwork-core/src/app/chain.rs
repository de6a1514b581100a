//! Chain scheduler: hands the next hop of `_chain` to the queue.

use tracing::{debug, info};

use crate::domain::{Job, TaskIdentifier};
use crate::error::ChainError;
use crate::ports::TaskQueue;

/// Advance `job`'s chain by one hop.
///
/// - empty or absent `_chain`: nothing is enqueued, returns `Ok(None)`
/// - otherwise exactly one `enqueue(head, successor)` call, returns the head
///
/// The successor is built by [`Job::successor`]; `job` itself is not touched.
/// Enqueue failures are returned as is, without retry.
pub async fn advance(
    job: &Job,
    queue: &dyn TaskQueue,
) -> Result<Option<TaskIdentifier>, ChainError> {
    let Some((head, successor)) = job.successor()? else {
        debug!("no chained task");
        return Ok(None);
    };

    let remaining = successor.chain()?.len();
    info!(next = %head, remaining, "enqueueing chained task");
    queue.enqueue(&head, successor).await?;
    Ok(Some(head))
}
