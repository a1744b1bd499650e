//! Typed Ethereum JSON-RPC client.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, B256, Bytes, U64};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::objects::rpc::{LogFilter, RpcLog, TransactionReceipt, TransactionRequest};

/// Errors produced by the JSON-RPC client.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport-level failure (DNS, TLS, connection refused, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status code.
    #[error("endpoint returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The node rejected the request.
    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RpcError {
    /// Whether the node reported an execution revert.
    pub fn is_revert(&self) -> bool {
        match self {
            RpcError::Node { code, message } => {
                *code == 3 || message.to_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

/// Empty positional parameter list.
const NO_PARAMS: [(); 0] = [];

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client for an Ethereum node.
///
/// Transactions are submitted with `eth_sendTransaction`, so signing is
/// left to the node's managed accounts (Hardhat, Anvil, Geth dev mode).
#[derive(Debug)]
pub struct JsonRpcClient {
    http: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a new client for the node at `endpoint`.
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue a raw JSON-RPC call.
    ///
    /// A `null` result deserializes into `R`, so methods that may return
    /// nothing should use an `Option` result type.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, RpcError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RpcError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let response: RpcResponse = serde_json::from_slice(&bytes)?;
        if let Some(error) = response.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }
        let result = response.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result).map_err(RpcError::Json)
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U64 = self.request("eth_chainId", NO_PARAMS).await?;
        Ok(id.to::<u64>())
    }

    /// `eth_accounts`
    pub async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.request("eth_accounts", NO_PARAMS).await
    }

    /// `eth_blockNumber`
    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let number: U64 = self.request("eth_blockNumber", NO_PARAMS).await?;
        Ok(number.to::<u64>())
    }

    /// `eth_sendTransaction`, returning the transaction hash.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError> {
        self.request("eth_sendTransaction", [tx]).await
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    pub async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", [hash]).await
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, RpcError> {
        self.request("eth_call", (tx, "latest")).await
    }

    /// `eth_getLogs`
    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<RpcLog>, RpcError> {
        self.request("eth_getLogs", [filter]).await
    }
}
