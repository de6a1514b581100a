//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::{Job, TaskIdentifier};
use crate::error::{JobError, QueueError};
use crate::ports::TaskQueue;
use crate::typed::{FromJob, Task, TaskContext};

/// Queue that records every enqueue call.
#[derive(Default)]
pub struct RecordingQueue {
    calls: Mutex<Vec<(TaskIdentifier, Job)>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(TaskIdentifier, Job)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskQueue for RecordingQueue {
    async fn enqueue(&self, identifier: &TaskIdentifier, job: Job) -> Result<(), QueueError> {
        self.calls.lock().unwrap().push((identifier.clone(), job));
        Ok(())
    }
}

/// Queue that rejects every enqueue.
pub struct FailingQueue;

#[async_trait]
impl TaskQueue for FailingQueue {
    async fn enqueue(&self, _identifier: &TaskIdentifier, _job: Job) -> Result<(), QueueError> {
        Err(QueueError::OperationFailed("disk full".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("before failed")]
    Before,

    #[error("run failed (token={0})")]
    Run(u64),

    #[error("after failed")]
    After,
}

/// Shared, ordered record of hook calls.
pub type HookLog = Arc<Mutex<Vec<&'static str>>>;

/// Task recording its hook calls, with switchable failures.
#[derive(Default)]
pub struct ProbeTask {
    pub log: HookLog,
    pub fail_before: bool,
    pub fail_run: Option<u64>,
    pub fail_after: bool,
    pub seen_error: Option<ProbeError>,
}

impl ProbeTask {
    pub fn new(log: HookLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn failing_run(log: HookLog, token: u64) -> Self {
        Self {
            fail_run: Some(token),
            ..Self::new(log)
        }
    }

    fn record(&self, hook: &'static str) {
        self.log.lock().unwrap().push(hook);
    }
}

#[async_trait]
impl Task for ProbeTask {
    type Error = ProbeError;

    async fn before(&mut self, _ctx: &TaskContext<'_>) -> Result<(), ProbeError> {
        self.record("before");
        if self.fail_before {
            return Err(ProbeError::Before);
        }
        Ok(())
    }

    async fn run(&mut self, _ctx: &TaskContext<'_>) -> Result<(), ProbeError> {
        self.record("run");
        match self.fail_run {
            Some(token) => Err(ProbeError::Run(token)),
            None => Ok(()),
        }
    }

    async fn errored(&mut self, _ctx: &TaskContext<'_>, error: &ProbeError) {
        self.record("errored");
        self.seen_error = Some(error.clone());
    }

    async fn after(&mut self, _ctx: &TaskContext<'_>) -> Result<(), ProbeError> {
        self.record("after");
        if self.fail_after {
            return Err(ProbeError::After);
        }
        Ok(())
    }
}

/// Registry-friendly task: fails its run when the job says so.
pub struct Flaky;

impl FromJob for Flaky {
    fn from_job(_job: &Job) -> Result<Self, JobError> {
        Ok(Flaky)
    }
}

#[async_trait]
impl Task for Flaky {
    type Error = ProbeError;

    async fn run(&mut self, ctx: &TaskContext<'_>) -> Result<(), ProbeError> {
        match ctx.job().get("fail").and_then(serde_json::Value::as_u64) {
            Some(token) => Err(ProbeError::Run(token)),
            None => Ok(()),
        }
    }
}

pub fn hook_log() -> HookLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn hooks(log: &HookLog) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}
