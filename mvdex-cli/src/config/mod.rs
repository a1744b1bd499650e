//! Configuration module for the `mvdex` binary.
//!
//! Handles loading configuration from the TOML file and CLI overrides,
//! and converting it into the runtime configuration of the core crate.

pub mod file;

use crate::config::file::FileConfig;
use alloy_primitives::Address;
use mvdex_core::chain::ConfirmationPolicy;
use mvdex_core::config::{DeploymentConfig, ListenerConfig, SeedPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Node connection settings.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub rpc_url: Url,
    pub chain_id: Option<u64>,
    pub deployer: Option<Address>,
}

/// Deployment settings that do not depend on the node.
#[derive(Debug, Clone)]
pub struct DeploymentSettings {
    pub confirmations: Option<u64>,
    pub seed_recipient: Address,
    pub seed_on_any_chain: bool,
    pub checkpoint: PathBuf,
    pub confirmation: ConfirmationPolicy,
}

impl DeploymentSettings {
    /// Complete the settings with what the node reported.
    pub fn for_chain(&self, chain_id: u64, deployer: Address) -> DeploymentConfig {
        let mut config = DeploymentConfig::new(chain_id, deployer);
        if let Some(confirmations) = self.confirmations {
            config = config.with_confirmations(confirmations);
        }
        config
            .with_seed(SeedPolicy::for_chain(
                chain_id,
                self.seed_recipient,
                self.seed_on_any_chain,
            ))
            .with_confirmation_policy(self.confirmation)
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub token: PathBuf,
    pub exchange: PathBuf,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub network: NetworkConfig,
    pub deployment: DeploymentSettings,
    pub artifacts: ArtifactPaths,
    pub events_poll_interval: Duration,
}

impl LoadedConfig {
    pub fn listener(&self, start_block: u64) -> ListenerConfig {
        ListenerConfig {
            start_block,
            poll_interval: self.events_poll_interval,
        }
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    rpc_url_override: Option<Url>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, rpc_url_override: Option<Url>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            rpc_url_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// A missing file yields the defaults for a local development node.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(rpc_url) = &self.rpc_url_override {
            file_config.network.rpc_url = rpc_url.clone();
        }

        self.validate(&file_config)?;
        Ok(self.build_loaded_config(file_config))
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let scheme = config.network.rpc_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::ValidationError(format!(
                "rpc_url must be http or https, got {scheme}"
            )));
        }
        if config.deployment.poll_interval_ms == 0 || config.events.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if config.deployment.confirmation_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "confirmation_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> LoadedConfig {
        let deployment = file_config.deployment;
        LoadedConfig {
            network: NetworkConfig {
                rpc_url: file_config.network.rpc_url,
                chain_id: file_config.network.chain_id,
                deployer: file_config.network.deployer,
            },
            deployment: DeploymentSettings {
                confirmations: deployment.confirmations,
                seed_recipient: deployment.seed_recipient,
                seed_on_any_chain: deployment.seed_on_any_chain,
                checkpoint: deployment.checkpoint,
                confirmation: ConfirmationPolicy {
                    poll_interval: Duration::from_millis(deployment.poll_interval_ms),
                    timeout: Duration::from_secs(deployment.confirmation_timeout_secs),
                },
            },
            artifacts: ArtifactPaths {
                token: file_config.artifacts.token,
                exchange: file_config.artifacts.exchange,
            },
            events_poll_interval: Duration::from_millis(file_config.events.poll_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvdex_core::config::{LOCAL_CHAIN_ID, default_seed_recipient};

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mvdex-{name}-{}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loader = ConfigLoader::new("/nonexistent/mvdex.toml", None);
        let config = loader.load().unwrap();
        assert_eq!(config.network.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(config.deployment.confirmation.timeout, Duration::from_secs(300));
        assert_eq!(config.listener(1).poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_rpc_url_override() {
        let path = write_config("override", "[network]\nrpc_url = \"http://10.0.0.2:8545\"\n");
        let loader = ConfigLoader::new(&path, Some(Url::parse("http://127.0.0.1:9545").unwrap()));
        let config = loader.load().unwrap();
        assert_eq!(config.network.rpc_url.as_str(), "http://127.0.0.1:9545/");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let path = write_config("zero-poll", "[events]\npoll_interval_ms = 0\n");
        let err = ConfigLoader::new(&path, None).load().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_seed_policy_follows_chain() {
        let config = ConfigLoader::new("/nonexistent/mvdex.toml", None).load().unwrap();
        let deployer = default_seed_recipient();

        let local = config.deployment.for_chain(LOCAL_CHAIN_ID, deployer);
        assert_eq!(
            local.seed,
            SeedPolicy::Transfer {
                recipient: default_seed_recipient()
            }
        );
        assert_eq!(local.effective_exchange_confirmations(), 1);

        let live = config.deployment.for_chain(1, deployer);
        assert_eq!(live.seed, SeedPolicy::Skip);
        assert_eq!(live.effective_exchange_confirmations(), 5);
    }

    #[test]
    fn test_configured_confirmations_apply_on_local_chain() {
        let path = write_config("local-confirmations", "[deployment]\nconfirmations = 3\n");
        let config = ConfigLoader::new(&path, None).load().unwrap();
        let local = config
            .deployment
            .for_chain(LOCAL_CHAIN_ID, default_seed_recipient());
        assert_eq!(local.effective_exchange_confirmations(), 3);
        std::fs::remove_file(path).unwrap();
    }
}
