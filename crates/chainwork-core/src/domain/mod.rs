//! Domain model (identifiers, jobs, execution state).

pub mod identifier;
pub mod ids;
pub mod job;
pub mod state;

pub use identifier::TaskIdentifier;
pub use ids::ExecutionId;
pub use job::{CHAIN_KEY, Job, TASK_KEY};
pub use state::ExecutionState;
