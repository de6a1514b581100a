//! Task trait - the lifecycle contract every task type implements
//!
//! # Hooks
//! - `before`: setup; a failure aborts the whole execution
//! - `run`: the task body; the only phase whose failure is recovered
//! - `errored`: notified with the captured `run` failure
//! - `after`: always runs once `run` has been entered

use async_trait::async_trait;

use crate::domain::{Job, TaskIdentifier};
use crate::error::JobError;
use crate::ports::TaskQueue;

/// What a hook can see of its execution: the job, its own identifier and the
/// queue it may enqueue extra work on.
pub struct TaskContext<'a> {
    identifier: &'a TaskIdentifier,
    job: &'a Job,
    queue: &'a dyn TaskQueue,
}

impl<'a> TaskContext<'a> {
    pub fn new(identifier: &'a TaskIdentifier, job: &'a Job, queue: &'a dyn TaskQueue) -> Self {
        Self {
            identifier,
            job,
            queue,
        }
    }

    pub fn identifier(&self) -> &TaskIdentifier {
        self.identifier
    }

    pub fn job(&self) -> &Job {
        self.job
    }

    pub fn queue(&self) -> &dyn TaskQueue {
        self.queue
    }

    /// The job stamped with this task's identifier.
    pub fn specification(&self) -> Job {
        self.job.stamped(self.identifier)
    }
}

/// A task type driven by [`TaskExecution`](crate::app::TaskExecution).
///
/// # 使用例
/// ```ignore
/// struct FetchPackage { package: String }
///
/// #[async_trait]
/// impl Task for FetchPackage {
///     type Error = FetchError;
///
///     async fn run(&mut self, ctx: &TaskContext<'_>) -> Result<(), FetchError> {
///         download(&self.package).await
///     }
/// }
/// ```
///
/// `FetchPackage` is routed as `fetch_package`. Override [`Task::identifier`]
/// to pin a key that must survive a type rename.
#[async_trait]
pub trait Task: Send + 'static {
    /// Failure type of the hooks. A `run` failure is kept as is on the
    /// execution so callers can match on it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Routing identifier of this task type.
    fn identifier() -> TaskIdentifier
    where
        Self: Sized,
    {
        TaskIdentifier::of::<Self>()
    }

    async fn before(&mut self, _ctx: &TaskContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn run(&mut self, ctx: &TaskContext<'_>) -> Result<(), Self::Error>;

    async fn errored(&mut self, _ctx: &TaskContext<'_>, _error: &Self::Error) {}

    async fn after(&mut self, _ctx: &TaskContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Build a task value from the job it is about to execute.
///
/// Used by the registry; payload validation is up to the implementation.
pub trait FromJob: Sized {
    fn from_job(job: &Job) -> Result<Self, JobError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TaskExecution;
    use crate::error::QueueError;
    use crate::testing::{ProbeTask, RecordingQueue};
    use std::sync::Arc;

    struct RenamedTask;

    #[async_trait]
    impl Task for RenamedTask {
        type Error = std::io::Error;

        fn identifier() -> TaskIdentifier {
            TaskIdentifier::new("legacy_name")
        }

        async fn run(&mut self, _ctx: &TaskContext<'_>) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Fans out an audit job from its `after` hook.
    struct Audited;

    #[async_trait]
    impl Task for Audited {
        type Error = QueueError;

        async fn run(&mut self, _ctx: &TaskContext<'_>) -> Result<(), QueueError> {
            Ok(())
        }

        async fn after(&mut self, ctx: &TaskContext<'_>) -> Result<(), QueueError> {
            let audit = Job::new().with("source", ctx.identifier().as_str());
            ctx.queue().enqueue(&TaskIdentifier::new("audit"), audit).await
        }
    }

    #[test]
    fn identifier_defaults_to_type_name() {
        assert_eq!(ProbeTask::identifier(), "probe_task");
    }

    #[test]
    fn identifier_can_be_pinned() {
        assert_eq!(RenamedTask::identifier(), "legacy_name");
    }

    #[test]
    fn context_specification_stamps_identifier() {
        let queue = RecordingQueue::new();
        let id = TaskIdentifier::new("ident");
        let job = Job::new().with("foo", "bar");
        let ctx = TaskContext::new(&id, &job, &queue);

        let spec = ctx.specification();
        assert_eq!(spec.task(), Some("ident"));
        assert_eq!(spec.get("foo"), Some(&serde_json::json!("bar")));
        assert_eq!(ctx.job().task(), None);
    }

    #[tokio::test]
    async fn hooks_can_enqueue_extra_work_through_context() {
        let queue = Arc::new(RecordingQueue::new());
        let job = Job::new().with("foo", "bar").with_chain(["next"]);
        let mut exec = TaskExecution::new(queue.clone(), job, Audited);

        exec.execute().await.unwrap();

        // hook enqueue happens in `after`, before the chain step
        assert_eq!(
            queue.calls(),
            vec![
                (TaskIdentifier::new("audit"), Job::new().with("source", "audited")),
                (TaskIdentifier::new("next"), Job::new().with("foo", "bar")),
            ]
        );
    }
}
