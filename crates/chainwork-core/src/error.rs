use thiserror::Error;

use crate::domain::TaskIdentifier;

/// Problems with the shape of a job mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("job must be a JSON object")]
    NotAnObject,

    #[error("malformed _chain: {reason}")]
    MalformedChain { reason: String },

    #[error("payload decode: {0}")]
    Payload(String),
}

/// Failure reported by a queue implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("queue is closed")]
    Closed,

    #[error("queue operation failed: {0}")]
    OperationFailed(String),
}

/// Failure while advancing a job's chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    MalformedChain(#[from] JobError),

    #[error("enqueue of chained task failed: {0}")]
    Enqueue(#[from] QueueError),
}

/// Failures that escape [`TaskExecution::execute`](crate::app::TaskExecution::execute).
///
/// A failing `run` is never reported here; it is captured on the execution.
#[derive(Debug, Error)]
pub enum ExecuteError<E>
where
    E: std::error::Error + 'static,
{
    #[error("before hook failed: {0}")]
    Setup(#[source] E),

    #[error("after hook failed: {0}")]
    Teardown(#[source] E),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("task execution has already run")]
    AlreadyExecuted,
}

/// Failures of the type-erased dispatch path.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("handler not found for task={0}")]
    HandlerNotFound(TaskIdentifier),

    #[error("cannot build task from job: {0}")]
    Decode(#[from] JobError),

    #[error("task={identifier}: {source}")]
    Execute {
        identifier: TaskIdentifier,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("task={identifier} panicked: {reason}")]
    Panicked {
        identifier: TaskIdentifier,
        reason: String,
    },
}
