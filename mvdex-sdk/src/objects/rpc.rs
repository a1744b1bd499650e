//! Ethereum JSON-RPC request and response objects.
//!
//! Only the fields the deployment sequencer and the event listener read
//! are modelled; unknown fields in node responses are ignored.

use alloy_primitives::{Address, B256, Bytes, U64, U256};
use serde::{Deserialize, Serialize, Serializer};

/// Parameters of `eth_sendTransaction` / `eth_call`.
///
/// Transactions are signed by the node, so `from` must be one of the
/// accounts it manages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

impl TransactionRequest {
    /// A contract creation carrying `init_code` (bytecode + encoded
    /// constructor arguments).
    pub fn deploy(from: Address, init_code: impl Into<Bytes>) -> Self {
        Self {
            from,
            data: Some(init_code.into()),
            ..Default::default()
        }
    }

    /// A call to `to` with ABI-encoded `data`.
    pub fn call(from: Address, to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from,
            to: Some(to),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas_limit(mut self, gas: u64) -> Self {
        self.gas = Some(U64::from(gas));
        self
    }
}

/// Result of `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: U64,
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// `0x1` on success, `0x0` on revert. Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|s| s == U64::from(1))
    }

    pub fn block(&self) -> u64 {
        self.block_number.to::<u64>()
    }
}

/// An entry of `eth_getLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: U64,
    pub transaction_hash: B256,
    pub log_index: U64,
    /// Set when the log was dropped by a chain reorganization.
    #[serde(default)]
    pub removed: bool,
}

/// A block reference in a log filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(u64),
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockTag::Latest => serializer.serialize_str("latest"),
            BlockTag::Number(n) => serializer.serialize_str(&format!("{n:#x}")),
        }
    }
}

/// Parameters of `eth_getLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<Option<B256>>,
    pub from_block: BlockTag,
    pub to_block: BlockTag,
}

impl LogFilter {
    /// Logs of a single event signature emitted by `address`.
    pub fn event(address: Address, signature_hash: B256, from: u64, to: BlockTag) -> Self {
        Self {
            address,
            topics: vec![Some(signature_hash)],
            from_block: BlockTag::Number(from),
            to_block: to,
        }
    }
}
