//! Dispatcher - routes `(identifier, job)` to the registered task type.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

use crate::config::EngineConfig;
use crate::domain::{ExecutionId, ExecutionState, Job, TaskIdentifier};
use crate::error::DispatchError;
use crate::ports::TaskQueue;
use crate::typed::{BoxError, TaskRegistry};

/// What happened to one dispatched job whose lifecycle completed.
#[derive(Debug)]
pub struct ExecutionReport {
    pub execution_id: ExecutionId,
    pub identifier: TaskIdentifier,
    pub state: ExecutionState,
    /// The `run` failure, boxed but otherwise untouched.
    pub captured_error: Option<BoxError>,
    /// Where the chain was advanced to, if anywhere.
    pub chained: Option<TaskIdentifier>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> bool {
        self.captured_error.is_none()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs jobs through the task type registered for their identifier.
///
/// Design:
/// - registry is immutable once built (shared via `Arc`)
/// - every engine gets the same queue, so chained work lands back here
pub struct Dispatcher {
    registry: Arc<TaskRegistry>,
    queue: Arc<dyn TaskQueue>,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<TaskRegistry>, queue: Arc<dyn TaskQueue>, config: EngineConfig) -> Self {
        Self {
            registry,
            queue,
            config,
        }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute one job.
    ///
    /// `Ok` means the lifecycle completed (the run itself may still have
    /// failed, see [`ExecutionReport::captured_error`]).
    pub async fn dispatch(
        &self,
        identifier: &TaskIdentifier,
        job: Job,
    ) -> Result<ExecutionReport, DispatchError> {
        let task = self
            .registry
            .get(identifier)
            .ok_or_else(|| DispatchError::HandlerNotFound(identifier.clone()))?;

        let execution_id = ExecutionId::new();
        let span = info_span!("task", task = %identifier, execution = %execution_id);

        async move {
            let started_at = Utc::now();
            info!("dispatching");
            let run = task
                .execute_dyn(Arc::clone(&self.queue), job, &self.config)
                .await?;
            let finished_at = Utc::now();

            match &run.captured_error {
                Some(e) => warn!(error = %e, chained = ?run.chained, "finished with failure"),
                None => info!(chained = ?run.chained, "finished"),
            }

            Ok::<_, DispatchError>(ExecutionReport {
                execution_id,
                identifier: identifier.clone(),
                state: run.state,
                captured_error: run.captured_error,
                chained: run.chained,
                started_at,
                finished_at,
            })
        }
        .instrument(span)
        .await
    }
}
