use serde::{Deserialize, Serialize};

use chainwork_core::EngineConfig;

/// Agent settings, read from YAML.
///
/// ```yaml
/// workers: 4
/// log_filter: info
/// engine:
///   chain_policy: on_success
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub workers: usize,
    pub log_filter: String,
    pub engine: EngineConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            workers: 4,
            log_filter: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let config: AgentConfig = serde_yaml::from_str(contents)?;
        if config.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwork_core::ChainPolicy;

    #[test]
    fn parses_full_config() {
        let config = AgentConfig::from_yaml(
            "workers: 2\nlog_filter: debug\nengine:\n  chain_policy: on_success\n",
        )
        .unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.engine.chain_policy, ChainPolicy::OnSuccess);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = AgentConfig::from_yaml("workers: 8\n").unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.engine.chain_policy, ChainPolicy::Always);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(AgentConfig::from_yaml("workers: 0\n").is_err());
    }
}
