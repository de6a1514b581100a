//! Type erasure for task types
//!
//! `Task` has an associated error type and a static `identifier()`, so it
//! cannot live in a `HashMap` as a trait object. `TypedTask<T, F>` wraps a
//! factory for `T` and exposes it as the object-safe `DynTask`.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

use super::task::Task;
use crate::app::TaskExecution;
use crate::config::EngineConfig;
use crate::domain::{ExecutionState, Job, TaskIdentifier};
use crate::error::{DispatchError, JobError};
use crate::ports::TaskQueue;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a type-erased execution whose lifecycle completed.
///
/// `captured_error` is the `run` failure boxed as is; callers can
/// `downcast_ref` it back to the task's error type.
#[derive(Debug)]
pub struct ErasedRun {
    pub state: ExecutionState,
    pub captured_error: Option<BoxError>,
    pub chained: Option<TaskIdentifier>,
}

/// Object-safe view of a task type.
#[async_trait]
pub trait DynTask: Send + Sync {
    fn identifier(&self) -> &TaskIdentifier;

    /// Build the task from `job` and drive one full execution.
    async fn execute_dyn(
        &self,
        queue: Arc<dyn TaskQueue>,
        job: Job,
        config: &EngineConfig,
    ) -> Result<ErasedRun, DispatchError>;
}

pub struct TypedTask<T, F> {
    identifier: TaskIdentifier,
    factory: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> TypedTask<T, F>
where
    T: Task,
    F: Fn(&Job) -> Result<T, JobError> + Send + Sync + 'static,
{
    pub fn new(factory: F) -> Self {
        Self {
            identifier: T::identifier(),
            factory,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> DynTask for TypedTask<T, F>
where
    T: Task,
    F: Fn(&Job) -> Result<T, JobError> + Send + Sync + 'static,
{
    fn identifier(&self) -> &TaskIdentifier {
        &self.identifier
    }

    async fn execute_dyn(
        &self,
        queue: Arc<dyn TaskQueue>,
        job: Job,
        config: &EngineConfig,
    ) -> Result<ErasedRun, DispatchError> {
        let task = (self.factory)(&job)?;
        let mut execution = TaskExecution::with_config(queue, job, task, config.clone());

        execution
            .execute()
            .await
            .map_err(|e| DispatchError::Execute {
                identifier: self.identifier.clone(),
                source: Box::new(e),
            })?;

        let state = execution.state();
        let chained = execution.chained().cloned();
        let captured_error = execution
            .into_captured_error()
            .map(|e| Box::new(e) as BoxError);

        Ok(ErasedRun {
            state,
            captured_error,
            chained,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Flaky, ProbeError, RecordingQueue};
    use crate::typed::FromJob;
    use serde_json::json;

    fn erased() -> TypedTask<Flaky, fn(&Job) -> Result<Flaky, JobError>> {
        TypedTask::new(Flaky::from_job as fn(&Job) -> Result<Flaky, JobError>)
    }

    #[test]
    fn identifier_comes_from_task_type() {
        assert_eq!(erased().identifier(), "flaky");
    }

    #[tokio::test]
    async fn captured_error_can_be_downcast() {
        let queue: Arc<dyn TaskQueue> = Arc::new(RecordingQueue::new());
        let job = Job::from_value(json!({"fail": 9})).unwrap();

        let run = erased()
            .execute_dyn(queue, job, &EngineConfig::default())
            .await
            .unwrap();

        assert_eq!(run.state, ExecutionState::Done);
        let err = run.captured_error.unwrap();
        assert_eq!(err.downcast_ref::<ProbeError>(), Some(&ProbeError::Run(9)));
    }

    #[tokio::test]
    async fn factory_failure_is_a_decode_error() {
        let typed = TypedTask::new(|_job: &Job| -> Result<Flaky, JobError> {
            Err(JobError::Payload("missing package".into()))
        });
        let queue: Arc<dyn TaskQueue> = Arc::new(RecordingQueue::new());

        let err = typed
            .execute_dyn(queue, Job::new(), &EngineConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Decode(JobError::Payload(_))));
    }
}
