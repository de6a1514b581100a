//! Ports - seams to collaborators outside the core
//!
//! Only the queue is needed by the execution envelope; everything else an
//! agent talks to (storage, package sources...) is the task body's concern.

pub mod task_queue;

pub use self::task_queue::TaskQueue;
