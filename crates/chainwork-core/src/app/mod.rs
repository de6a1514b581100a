//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **TaskExecution**: one job through before/run/errored/after + chain advance
//! - **chain**: `_chain` rewrite and the single follow-up enqueue
//! - **Dispatcher**: identifier -> registered task type -> TaskExecution
//! - **AppBuilder**: registry wiring with fail-fast validation
//! - **WorkerGroup**: workers draining the in-memory queue

pub mod builder;
pub mod chain;
pub mod dispatcher;
pub mod execution;
pub mod worker_loop;

pub use self::builder::{AppBuilder, BuildError};
pub use self::dispatcher::{Dispatcher, ExecutionReport};
pub use self::execution::TaskExecution;
pub use self::worker_loop::{WorkerGroup, WorkerReport};
