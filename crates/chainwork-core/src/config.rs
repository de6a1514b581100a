//! Engine configuration.

use serde::{Deserialize, Serialize};

/// When the chain is advanced after `after` has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPolicy {
    /// Advance after every run, successful or failed.
    #[default]
    Always,

    /// Advance only when `run` succeeded; a failed run drops the rest of the chain.
    OnSuccess,
}

impl ChainPolicy {
    pub fn should_advance(self, run_failed: bool) -> bool {
        match self {
            ChainPolicy::Always => true,
            ChainPolicy::OnSuccess => !run_failed,
        }
    }
}

impl std::str::FromStr for ChainPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ChainPolicy::Always),
            "on_success" | "on-success" => Ok(ChainPolicy::OnSuccess),
            other => Err(format!("unknown chain policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub chain_policy: ChainPolicy,
}

impl EngineConfig {
    pub fn with_chain_policy(mut self, chain_policy: ChainPolicy) -> Self {
        self.chain_policy = chain_policy;
        self
    }
}
