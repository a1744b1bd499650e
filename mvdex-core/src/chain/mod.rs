//! The chain access seam.
//!
//! Everything that talks to a node goes through [`ChainBackend`], so the
//! sequencer and the event listener can run against the JSON-RPC client
//! in production and an in-memory chain in tests.

mod confirmations;

pub use confirmations::{ConfirmationPolicy, wait_for_confirmations};

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use mvdex_sdk::client::{JsonRpcClient, RpcError};
use mvdex_sdk::objects::{LogFilter, RpcLog, TransactionReceipt, TransactionRequest};
use thiserror::Error;

/// Errors surfaced by chain access.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The node could not be reached or answered with an error.
    #[error("rpc error: {0}")]
    Rpc(RpcError),

    /// A transaction or call reverted.
    #[error("execution reverted{}: {reason}", .hash.map(|h| format!(" in {h}")).unwrap_or_default())]
    Reverted { hash: Option<B256>, reason: String },

    /// The transaction did not collect enough confirmations in time.
    #[error("transaction {hash} did not reach {confirmations} confirmations in time")]
    ConfirmationTimeout { hash: B256, confirmations: u64 },

    /// A contract creation receipt carried no contract address.
    #[error("receipt of {0} has no contract address")]
    MissingContractAddress(B256),

    /// Call output did not match the expected ABI.
    #[error("abi decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),
}

impl From<RpcError> for ChainError {
    fn from(err: RpcError) -> Self {
        if err.is_revert() {
            ChainError::Reverted {
                hash: None,
                reason: err.to_string(),
            }
        } else {
            ChainError::Rpc(err)
        }
    }
}

/// Access to an Ethereum node.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Accounts managed (and unlocked) by the node.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Submit a transaction for the node to sign; returns its hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, ChainError>;

    /// Receipt of a mined transaction, `None` while pending.
    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ChainError>;

    /// Execute a read-only call against the latest block.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ChainError>;

    async fn logs(&self, filter: LogFilter) -> Result<Vec<RpcLog>, ChainError>;
}

#[async_trait]
impl ChainBackend for JsonRpcClient {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(JsonRpcClient::chain_id(self).await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        Ok(JsonRpcClient::accounts(self).await?)
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(JsonRpcClient::block_number(self).await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, ChainError> {
        Ok(JsonRpcClient::send_transaction(self, &tx).await?)
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        Ok(JsonRpcClient::transaction_receipt(self, hash).await?)
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ChainError> {
        Ok(JsonRpcClient::call(self, &tx).await?)
    }

    async fn logs(&self, filter: LogFilter) -> Result<Vec<RpcLog>, ChainError> {
        Ok(JsonRpcClient::logs(self, &filter).await?)
    }
}
