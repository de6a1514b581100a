//! chainwork-core
//!
//! Execution envelope for queue-driven agent tasks: lifecycle hooks, run
//! failure capture, routing identifiers and `_chain` continuation.
//!
//! # モジュール構成
//! - **domain**: TaskIdentifier, Job, ExecutionState, ExecutionId
//! - **ports**: TaskQueue (the only collaborator the engine needs)
//! - **typed**: Task trait, TaskContext, type-erased registry
//! - **app**: TaskExecution, chain scheduler, Dispatcher, AppBuilder, WorkerGroup
//! - **impls**: InMemoryTaskQueue
//! - **config**: EngineConfig, ChainPolicy
//! - **error**: error types

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod typed;

#[cfg(test)]
mod testing;

pub use app::{AppBuilder, Dispatcher, ExecutionReport, TaskExecution, WorkerGroup};
pub use config::{ChainPolicy, EngineConfig};
pub use domain::{ExecutionState, Job, TaskIdentifier};
pub use error::{ChainError, DispatchError, ExecuteError, JobError, QueueError};
pub use ports::TaskQueue;
pub use typed::{FromJob, Task, TaskContext, TaskRegistry};
