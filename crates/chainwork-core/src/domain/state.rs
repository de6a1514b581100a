//! Lifecycle state machine of one task execution.

use serde::{Deserialize, Serialize};

/// Execution state.
///
/// State transitions:
/// - Idle -> BeforeHook -> Running -> Succeeded -> AfterHook -> ChainDecision -> Done
/// - Idle -> BeforeHook -> Running -> Failed -> AfterHook -> ChainDecision -> Done
/// - Idle -> BeforeHook -> Aborted (before hook failed)
/// - ... -> AfterHook -> Aborted (after hook failed)
/// - ... -> ChainDecision -> Aborted (chain could not be advanced)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    /// Constructed, nothing has run yet.
    Idle,

    /// `before` is running.
    BeforeHook,

    /// `run` is running.
    Running,

    /// `run` returned normally.
    Succeeded,

    /// `run` failed; the error is captured and `errored` has been notified.
    Failed,

    /// `after` is running.
    AfterHook,

    /// Deciding whether and where to enqueue the next hop.
    ChainDecision,

    /// Finished; `execute()` has returned `Ok`.
    Done,

    /// Finished through an uncaught failure.
    Aborted,
}

impl ExecutionState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionState::Done | ExecutionState::Aborted)
    }
}
