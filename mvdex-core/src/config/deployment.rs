//! Deployment configuration.

use crate::chain::ConfirmationPolicy;
use alloy_primitives::{Address, address};

/// Chain id of the local development node (Hardhat / Anvil).
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// The first development account of the local node.
pub fn default_seed_recipient() -> Address {
    address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
}

/// Whether the seed transfer step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    Skip,
    Transfer { recipient: Address },
}

impl SeedPolicy {
    /// Seeding only runs on the local chain unless `on_any_chain` is set.
    pub fn for_chain(chain_id: u64, recipient: Address, on_any_chain: bool) -> Self {
        if chain_id == LOCAL_CHAIN_ID || on_any_chain {
            SeedPolicy::Transfer { recipient }
        } else {
            SeedPolicy::Skip
        }
    }
}

/// Account and network context of a deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Chain the contracts are deployed to, as reported by the node.
    pub chain_id: u64,
    /// Node-managed account that sends every transaction.
    pub deployer: Address,
    /// Confirmations awaited after the exchange deployment. `None` picks
    /// the default for the chain.
    pub exchange_confirmations: Option<u64>,
    pub seed: SeedPolicy,
    pub confirmation: ConfirmationPolicy,
}

impl DeploymentConfig {
    pub const DEFAULT_CONFIRMATIONS: u64 = 5;

    pub fn new(chain_id: u64, deployer: Address) -> Self {
        Self {
            chain_id,
            deployer,
            exchange_confirmations: None,
            seed: SeedPolicy::for_chain(chain_id, default_seed_recipient(), false),
            confirmation: ConfirmationPolicy::default(),
        }
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.exchange_confirmations = Some(confirmations);
        self
    }

    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.confirmation = policy;
        self
    }

    /// Confirmations actually awaited for the exchange deployment.
    ///
    /// Without an explicit value the local node waits for inclusion only,
    /// since it mines a block per received transaction and nothing else.
    /// Every other chain defaults to [`Self::DEFAULT_CONFIRMATIONS`].
    pub fn effective_exchange_confirmations(&self) -> u64 {
        match self.exchange_confirmations {
            Some(confirmations) => confirmations.max(1),
            None if self.chain_id == LOCAL_CHAIN_ID => 1,
            None => Self::DEFAULT_CONFIRMATIONS,
        }
    }
}
