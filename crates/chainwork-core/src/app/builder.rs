//! AppBuilder - wiring of registry, queue and engine config
//!
//! # Fail-fast 設計
//! - `expect_tasks()` で期待される identifier を登録
//! - `build()` 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError を返す

use std::sync::Arc;

use super::dispatcher::Dispatcher;
use crate::config::EngineConfig;
use crate::domain::{Job, TaskIdentifier};
use crate::error::JobError;
use crate::ports::TaskQueue;
use crate::typed::{FromJob, RegistryError, Task, TaskRegistry};

/// # 使用例
/// ```ignore
/// let dispatcher = AppBuilder::new()
///     .register::<Fetch>()?
///     .register::<Extract>()?
///     .expect_tasks(&["fetch", "extract"])
///     .build(queue)?;
/// ```
pub struct AppBuilder {
    registry: TaskRegistry,
    expected_tasks: Option<Vec<String>>,
    config: EngineConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing task types: {0:?}. These tasks were expected but not registered.")]
    MissingTaskTypes(Vec<String>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            registry: TaskRegistry::new(),
            expected_tasks: None,
            config: EngineConfig::default(),
        }
    }

    pub fn register<T: Task + FromJob>(mut self) -> Result<Self, RegistryError> {
        self.registry.register::<T>()?;
        Ok(self)
    }

    pub fn register_with<T, F>(mut self, factory: F) -> Result<Self, RegistryError>
    where
        T: Task,
        F: Fn(&Job) -> Result<T, JobError> + Send + Sync + 'static,
    {
        self.registry.register_with::<T, F>(factory)?;
        Ok(self)
    }

    pub fn expect_tasks(mut self, task_types: &[&str]) -> Self {
        self.expected_tasks = Some(task_types.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate and produce a dispatcher enqueuing follow-ups on `queue`.
    pub fn build(self, queue: Arc<dyn TaskQueue>) -> Result<Dispatcher, BuildError> {
        if let Some(expected_tasks) = &self.expected_tasks {
            let missing_tasks: Vec<String> = expected_tasks
                .iter()
                .filter(|t| !self.registry.contains(&TaskIdentifier::new(t.as_str())))
                .cloned()
                .collect();
            if !missing_tasks.is_empty() {
                return Err(BuildError::MissingTaskTypes(missing_tasks));
            }
        }
        Ok(Dispatcher::new(Arc::new(self.registry), queue, self.config))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
