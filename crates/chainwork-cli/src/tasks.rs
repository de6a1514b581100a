//! Demo task bodies for the agent binary.
//!
//! Real agents plug in their own; these only log, sleep and fail on request
//! so the lifecycle and chaining can be watched end to end.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use chainwork_core::{FromJob, Job, JobError, Task, TaskContext};

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("package '{0}' not found")]
    NotFound(String),

    #[error("invalid job: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct PackagePayload {
    package: String,
}

/// Pretends to download `package`. Packages named `missing*` fail.
pub struct Fetch {
    package: String,
    started: Option<Instant>,
}

impl FromJob for Fetch {
    fn from_job(job: &Job) -> Result<Self, JobError> {
        let payload: PackagePayload = job.payload()?;
        Ok(Fetch {
            package: payload.package,
            started: None,
        })
    }
}

#[async_trait]
impl Task for Fetch {
    type Error = DemoError;

    async fn before(&mut self, _ctx: &TaskContext<'_>) -> Result<(), DemoError> {
        if self.package.trim().is_empty() {
            return Err(DemoError::Invalid("package must not be empty".to_string()));
        }
        self.started = Some(Instant::now());
        Ok(())
    }

    async fn run(&mut self, _ctx: &TaskContext<'_>) -> Result<(), DemoError> {
        info!(package = %self.package, "fetching");
        sleep(Duration::from_millis(50)).await;
        if self.package.starts_with("missing") {
            return Err(DemoError::NotFound(self.package.clone()));
        }
        Ok(())
    }

    async fn errored(&mut self, _ctx: &TaskContext<'_>, error: &DemoError) {
        warn!(package = %self.package, %error, "fetch gave up");
    }

    async fn after(&mut self, _ctx: &TaskContext<'_>) -> Result<(), DemoError> {
        if let Some(started) = self.started {
            debug!(elapsed_ms = started.elapsed().as_millis() as u64, "fetch finished");
        }
        Ok(())
    }
}

/// Pretends to unpack the fetched package.
pub struct Extract {
    package: String,
}

impl FromJob for Extract {
    fn from_job(job: &Job) -> Result<Self, JobError> {
        let payload: PackagePayload = job.payload()?;
        Ok(Extract {
            package: payload.package,
        })
    }
}

#[async_trait]
impl Task for Extract {
    type Error = DemoError;

    async fn run(&mut self, _ctx: &TaskContext<'_>) -> Result<(), DemoError> {
        info!(package = %self.package, "extracting");
        sleep(Duration::from_millis(20)).await;
        Ok(())
    }
}

/// Logs its own stamped specification.
pub struct Notify;

impl FromJob for Notify {
    fn from_job(_job: &Job) -> Result<Self, JobError> {
        Ok(Notify)
    }
}

#[async_trait]
impl Task for Notify {
    type Error = DemoError;

    async fn run(&mut self, ctx: &TaskContext<'_>) -> Result<(), DemoError> {
        let spec = serde_json::to_string(&ctx.specification())
            .map_err(|e| DemoError::Invalid(e.to_string()))?;
        info!(%spec, "notify");
        Ok(())
    }
}
