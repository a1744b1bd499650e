//! TOML file configuration structures.
//!
//! These structs directly map to the `mvdex.toml` file format. Every
//! section is optional; a missing file means a local development node.

use alloy_primitives::Address;
use mvdex_core::config::default_seed_recipient;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// Node connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Url,
    /// Expected chain id. The node's chain id is used when unset.
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Deploying account. The node's first account is used when unset.
    #[serde(default)]
    pub deployer: Option<Address>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: None,
            deployer: None,
        }
    }
}

fn default_rpc_url() -> Url {
    Url::parse("http://localhost:8545").expect("valid default url")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Confirmations awaited after deploying the exchange. Unset means 5,
    /// or inclusion only on the local node.
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default = "default_seed_recipient")]
    pub seed_recipient: Address,
    /// Run the seed transfer on chains other than the local node.
    #[serde(default)]
    pub seed_on_any_chain: bool,
    #[serde(default = "default_checkpoint")]
    pub checkpoint: PathBuf,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_deployment_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            confirmations: None,
            seed_recipient: default_seed_recipient(),
            seed_on_any_chain: false,
            checkpoint: default_checkpoint(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            poll_interval_ms: default_deployment_poll_interval_ms(),
        }
    }
}

fn default_checkpoint() -> PathBuf {
    PathBuf::from("./deployments.json")
}

fn default_confirmation_timeout_secs() -> u64 {
    300
}

fn default_deployment_poll_interval_ms() -> u64 {
    500
}

/// Compiled contract artifacts (Hardhat or Foundry JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_token_artifact")]
    pub token: PathBuf,
    #[serde(default = "default_exchange_artifact")]
    pub exchange: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            token: default_token_artifact(),
            exchange: default_exchange_artifact(),
        }
    }
}

fn default_token_artifact() -> PathBuf {
    PathBuf::from("./artifacts/contracts/Balloons.sol/Balloons.json")
}

fn default_exchange_artifact() -> PathBuf {
    PathBuf::from("./artifacts/contracts/DEX.sol/DEX.json")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_events_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_events_poll_interval_ms(),
        }
    }
}

fn default_events_poll_interval_ms() -> u64 {
    1000
}
