use super::{ChainBackend, ChainError};
use alloy_primitives::B256;
use mvdex_sdk::objects::TransactionReceipt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// How a transaction is awaited after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Delay between receipt / block number polls.
    pub poll_interval: Duration,
    /// Give up after this long without reaching the wanted confirmations.
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Wait until `hash` is mined and buried under enough blocks.
///
/// The block that includes the transaction counts as the first
/// confirmation. A receipt with a failed status is returned as
/// [`ChainError::Reverted`].
pub async fn wait_for_confirmations<B: ChainBackend + ?Sized>(
    backend: &B,
    hash: B256,
    confirmations: u64,
    policy: ConfirmationPolicy,
) -> Result<TransactionReceipt, ChainError> {
    let confirmations = confirmations.max(1);
    let deadline = Instant::now() + policy.timeout;

    loop {
        if let Some(receipt) = backend.transaction_receipt(hash).await? {
            if !receipt.succeeded() {
                return Err(ChainError::Reverted {
                    hash: Some(hash),
                    reason: "receipt status 0".to_string(),
                });
            }
            let latest = backend.block_number().await?;
            let depth = (latest + 1).saturating_sub(receipt.block());
            if depth >= confirmations {
                return Ok(receipt);
            }
            debug!(
                tx = %hash,
                depth = depth,
                wanted = confirmations,
                "Waiting for confirmations"
            );
        }

        if Instant::now() >= deadline {
            return Err(ChainError::ConfirmationTimeout {
                hash,
                confirmations,
            });
        }
        tokio::time::sleep(policy.poll_interval).await;
    }
}
