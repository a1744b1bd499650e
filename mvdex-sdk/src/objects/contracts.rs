//! Deployed contract references and the registry that collects them.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A contract deployed by the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedContract {
    /// Contract name as it appears in the artifacts (e.g. `Balloons`).
    pub name: String,
    pub address: Address,
    /// The account that deployed and owns the contract.
    pub owner_account: Address,
    /// Hash of the deploying transaction.
    pub transaction_hash: B256,
    /// Block the deployment was mined in.
    pub block_number: u64,
}

/// Deployed contracts keyed by name.
///
/// Shared between the deployment sequencer, which fills it, and the event
/// view, which looks up the address of the contract it listens to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, DeployedContract>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deployment, replacing any earlier entry with the same name.
    pub fn insert(&mut self, contract: DeployedContract) -> Option<DeployedContract> {
        self.contracts.insert(contract.name.clone(), contract)
    }

    pub fn get(&self, name: &str) -> Option<&DeployedContract> {
        self.contracts.get(name)
    }

    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.get(name).map(|c| c.address)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeployedContract> {
        self.contracts.values()
    }
}
