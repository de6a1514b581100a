//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryTaskQueue**: 開発用の FIFO キュー（`TaskQueue` port + pop/complete）
//!
//! Durable queues live outside this crate and only need to implement
//! `ports::TaskQueue`.

pub mod inmem_queue;

pub use self::inmem_queue::{InMemoryTaskQueue, QueuedJob};
