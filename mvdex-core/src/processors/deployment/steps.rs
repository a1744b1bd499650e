//! The deployment steps and the transactions they send.
//!
//! Amounts are fixed: they are part of the bootstrap contract with the
//! exchange, not deployment parameters.

use crate::contracts::{approve_calldata, exchange_init_code, init_calldata, transfer_calldata};
use alloy_primitives::{Address, Bytes, U256};
use mvdex_sdk::objects::{EtherAmount, TransactionRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas ceiling attached to the exchange `init` call.
pub const INIT_GAS_LIMIT: u64 = 200_000;

/// Tokens sent to the seed recipient (10 BAL).
pub fn seed_amount() -> EtherAmount {
    EtherAmount::ether(10)
}

/// Allowance granted to the exchange (100 BAL).
pub fn approve_amount() -> EtherAmount {
    EtherAmount::ether(100)
}

/// Tokens deposited by `init` (0.02 BAL).
pub fn init_token_amount() -> EtherAmount {
    EtherAmount::from_wei(U256::from(20_000_000_000_000_000u64))
}

/// ETH deposited alongside the tokens by `init` (0.02 ETH).
pub fn init_eth_value() -> EtherAmount {
    EtherAmount::from_wei(U256::from(20_000_000_000_000_000u64))
}

/// Sequencer steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    DeployToken,
    DeployExchange,
    SeedRecipient,
    ApproveExchange,
    InitExchange,
}

impl DeployStep {
    pub const ALL: [DeployStep; 5] = [
        DeployStep::DeployToken,
        DeployStep::DeployExchange,
        DeployStep::SeedRecipient,
        DeployStep::ApproveExchange,
        DeployStep::InitExchange,
    ];
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStep::DeployToken => "deploy_token",
            DeployStep::DeployExchange => "deploy_exchange",
            DeployStep::SeedRecipient => "seed_recipient",
            DeployStep::ApproveExchange => "approve_exchange",
            DeployStep::InitExchange => "init_exchange",
        };
        f.write_str(name)
    }
}

/// Deploy the token with no constructor arguments.
#[derive(Debug, Clone)]
pub struct DeployToken {
    pub bytecode: Bytes,
}

impl DeployToken {
    pub fn transaction(&self, from: Address) -> TransactionRequest {
        TransactionRequest::deploy(from, self.bytecode.clone())
    }
}

/// Deploy the exchange, passing the token address to its constructor.
#[derive(Debug, Clone)]
pub struct DeployExchange {
    pub bytecode: Bytes,
    pub token: Address,
}

impl DeployExchange {
    pub fn transaction(&self, from: Address) -> TransactionRequest {
        TransactionRequest::deploy(from, exchange_init_code(&self.bytecode, self.token))
    }
}

/// Transfer the seed amount of tokens to `recipient`.
#[derive(Debug, Clone, Copy)]
pub struct SeedRecipient {
    pub token: Address,
    pub recipient: Address,
}

impl SeedRecipient {
    pub fn transaction(&self, from: Address) -> TransactionRequest {
        TransactionRequest::call(from, self.token, transfer_calldata(self.recipient, seed_amount()))
    }
}

/// Allow the exchange to pull tokens from the deployer.
#[derive(Debug, Clone, Copy)]
pub struct ApproveExchange {
    pub token: Address,
    pub exchange: Address,
}

impl ApproveExchange {
    pub fn transaction(&self, from: Address) -> TransactionRequest {
        TransactionRequest::call(from, self.token, approve_calldata(self.exchange, approve_amount()))
    }
}

/// Seed the exchange pool with paired ETH and tokens.
#[derive(Debug, Clone, Copy)]
pub struct InitExchange {
    pub exchange: Address,
}

impl InitExchange {
    pub fn transaction(&self, from: Address) -> TransactionRequest {
        TransactionRequest::call(from, self.exchange, init_calldata(init_token_amount()))
            .with_value(init_eth_value().wei())
            .with_gas_limit(INIT_GAS_LIMIT)
    }
}
