//! TaskRegistry - identifier -> task type, populated at startup
//!
//! Built mutably during initialization, then shared read-only (`Arc`) by the
//! dispatcher. No locks at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{DynTask, TypedTask};
use super::task::{FromJob, Task};
use crate::domain::{Job, TaskIdentifier};
use crate::error::JobError;

#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskIdentifier, Arc<dyn DynTask>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("task type '{0}' is already registered")]
    AlreadyRegistered(TaskIdentifier),
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Register `T`, built from each job with [`FromJob`].
    pub fn register<T: Task + FromJob>(&mut self) -> Result<TaskIdentifier, RegistryError> {
        self.register_with::<T, _>(T::from_job)
    }

    /// Register `T` with a custom factory (e.g. one that injects shared state).
    pub fn register_with<T, F>(&mut self, factory: F) -> Result<TaskIdentifier, RegistryError>
    where
        T: Task,
        F: Fn(&Job) -> Result<T, JobError> + Send + Sync + 'static,
    {
        let identifier = T::identifier();
        if self.tasks.contains_key(&identifier) {
            return Err(RegistryError::AlreadyRegistered(identifier));
        }
        self.tasks
            .insert(identifier.clone(), Arc::new(TypedTask::<T, F>::new(factory)));
        Ok(identifier)
    }

    pub fn get(&self, identifier: &TaskIdentifier) -> Option<Arc<dyn DynTask>> {
        self.tasks.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &TaskIdentifier) -> bool {
        self.tasks.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn registered_types(&self) -> Vec<TaskIdentifier> {
        let mut ids: Vec<TaskIdentifier> = self.tasks.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
