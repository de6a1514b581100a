//! TaskExecution - runs one job through a task's lifecycle hooks
//!
//! # フロー
//! 1. `before` (failure -> `ExecuteError::Setup`, nothing else runs)
//! 2. `run` (failure -> captured, `errored` notified)
//! 3. `after` (always, once `run` was entered)
//! 4. chain advance (per `ChainPolicy`)

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::chain;
use crate::config::EngineConfig;
use crate::domain::{ExecutionState, Job, TaskIdentifier};
use crate::error::ExecuteError;
use crate::ports::TaskQueue;
use crate::typed::{Task, TaskContext};

/// Binds one job and one queue to one task value for a single execution.
///
/// Not reusable: a second [`execute`](Self::execute) is rejected.
pub struct TaskExecution<T: Task> {
    identifier: TaskIdentifier,
    task: T,
    job: Job,
    queue: Arc<dyn TaskQueue>,
    config: EngineConfig,
    state: ExecutionState,
    error: Option<T::Error>,
    chained: Option<TaskIdentifier>,
}

impl<T: Task> TaskExecution<T> {
    pub fn new(queue: Arc<dyn TaskQueue>, job: Job, task: T) -> Self {
        Self::with_config(queue, job, task, EngineConfig::default())
    }

    pub fn with_config(queue: Arc<dyn TaskQueue>, job: Job, task: T, config: EngineConfig) -> Self {
        Self {
            identifier: T::identifier(),
            task,
            job,
            queue,
            config,
            state: ExecutionState::Idle,
            error: None,
            chained: None,
        }
    }

    pub fn identifier(&self) -> &TaskIdentifier {
        &self.identifier
    }

    /// The job with `task` stamped to this task type's identifier.
    ///
    /// Read projection only: the stored job is unchanged.
    pub fn specification(&self) -> Job {
        self.job.stamped(&self.identifier)
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// The failure `run` returned, exactly as returned.
    pub fn captured_error(&self) -> Option<&T::Error> {
        self.error.as_ref()
    }

    pub fn into_captured_error(self) -> Option<T::Error> {
        self.error
    }

    /// Identifier the chain was advanced to, if a follow-up was enqueued.
    pub fn chained(&self) -> Option<&TaskIdentifier> {
        self.chained.as_ref()
    }

    /// Drive the lifecycle to completion.
    ///
    /// A failing `run` is not an error here: it is captured and `Ok(())` is
    /// returned. Only `before`/`after` failures and chain failures escape.
    pub async fn execute(&mut self) -> Result<(), ExecuteError<T::Error>> {
        if self.state != ExecutionState::Idle {
            return Err(ExecuteError::AlreadyExecuted);
        }

        let ctx = TaskContext::new(&self.identifier, &self.job, self.queue.as_ref());

        self.state = ExecutionState::BeforeHook;
        debug!(task = %self.identifier, "before");
        if let Err(e) = self.task.before(&ctx).await {
            self.state = ExecutionState::Aborted;
            error!(task = %self.identifier, error = %e, "before hook failed");
            return Err(ExecuteError::Setup(e));
        }

        self.state = ExecutionState::Running;
        debug!(task = %self.identifier, "run");
        match self.task.run(&ctx).await {
            Ok(()) => {
                self.state = ExecutionState::Succeeded;
            }
            Err(e) => {
                self.state = ExecutionState::Failed;
                warn!(task = %self.identifier, error = %e, "run failed");
                let captured = self.error.insert(e);
                self.task.errored(&ctx, captured).await;
            }
        }

        self.state = ExecutionState::AfterHook;
        debug!(task = %self.identifier, "after");
        if let Err(e) = self.task.after(&ctx).await {
            self.state = ExecutionState::Aborted;
            error!(task = %self.identifier, error = %e, "after hook failed");
            return Err(ExecuteError::Teardown(e));
        }

        self.state = ExecutionState::ChainDecision;
        let run_failed = self.error.is_some();
        if self.config.chain_policy.should_advance(run_failed) {
            match chain::advance(&self.job, self.queue.as_ref()).await {
                Ok(next) => self.chained = next,
                Err(e) => {
                    self.state = ExecutionState::Aborted;
                    error!(task = %self.identifier, error = %e, "chain advance failed");
                    return Err(e.into());
                }
            }
        } else {
            info!(task = %self.identifier, "run failed; remaining chain dropped");
        }

        self.state = ExecutionState::Done;
        debug!(task = %self.identifier, chained = ?self.chained, "done");
        Ok(())
    }
}
