//! Typed - 型付き Task API
//!
//! # 二層構造
//! - **表層（Typed）**: `Task` trait, `FromJob` - hooks and identifier per type
//! - **内部（Dyn）**: `DynTask` trait - object-safe, type erasure for the registry

pub mod task;
pub mod handler;
pub mod registry;

pub use self::task::{FromJob, Task, TaskContext};
pub use self::handler::{BoxError, DynTask, ErasedRun, TypedTask};
pub use self::registry::{RegistryError, TaskRegistry};
