//! DeploymentSequencer processor.
//!
//! The DeploymentSequencer is responsible for:
//! - Deploying the `Balloons` token and reading back its address
//! - Deploying the exchange with the token address, then waiting for the
//!   configured confirmations
//! - Seeding a development account with tokens (local chain only by default)
//! - Approving the exchange and initializing its liquidity pool
//! - Writing a checkpoint after every step so a failed run can resume
//! - Recording each sent transaction as pending, so a resume awaits it
//!   instead of sending the step twice
//!
//! Every step is an irreversible on-chain mutation. A failure aborts the
//! run with the underlying error; completed steps stay recorded.

mod steps;

pub use steps::{
    ApproveExchange, DeployExchange, DeployStep, DeployToken, INIT_GAS_LIMIT, InitExchange,
    SeedRecipient, approve_amount, init_eth_value, init_token_amount, seed_amount,
};

use crate::chain::{ChainBackend, ChainError, wait_for_confirmations};
use crate::checkpoint::{Checkpoint, CheckpointError, CheckpointStore, StepOutcome};
use crate::config::{DeploymentConfig, SeedPolicy};
use crate::contracts::{ArtifactError, ContractArtifacts, EXCHANGE_CONTRACT, TOKEN_CONTRACT, token_balance};
use alloy_primitives::{Address, B256};
use kanau::processor::Processor;
use mvdex_sdk::objects::{DeployedContract, TransactionReceipt, TransactionRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A step's transaction failed, reverted or timed out.
    #[error("step {step} failed: {source}")]
    Step {
        step: DeployStep,
        #[source]
        source: ChainError,
    },

    /// The node could not be queried outside of a step.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// The stored checkpoint was written for another network.
    #[error("checkpoint belongs to chain {checkpoint}, but the node reports chain {node}")]
    ChainMismatch { checkpoint: u64, node: u64 },

    /// A step needs a contract the checkpoint does not contain.
    #[error("step {step} requires {contract} to be deployed first")]
    MissingPrerequisite {
        step: DeployStep,
        contract: &'static str,
    },

    /// The node manages no account to deploy from.
    #[error("the node reports no accounts to deploy from")]
    NoAccounts,

    /// The configured deployer is not managed by the node.
    #[error("deployer {0} is not an account managed by the node")]
    DeployerNotManaged(Address),
}

/// Pick the deploying account: the configured one if the node manages
/// it, otherwise the node's first account.
pub async fn resolve_deployer<B: ChainBackend + ?Sized>(
    backend: &B,
    configured: Option<Address>,
) -> Result<Address, DeployError> {
    let accounts = backend.accounts().await?;
    match configured {
        Some(deployer) if accounts.contains(&deployer) => Ok(deployer),
        Some(deployer) => Err(DeployError::DeployerNotManaged(deployer)),
        None => accounts.first().copied().ok_or(DeployError::NoAccounts),
    }
}

/// Sequences the bootstrap of the token and exchange contracts.
pub struct DeploymentSequencer<B: ChainBackend> {
    backend: Arc<B>,
    config: DeploymentConfig,
    artifacts: ContractArtifacts,
}

impl<B: ChainBackend> DeploymentSequencer<B> {
    pub fn new(backend: Arc<B>, config: DeploymentConfig, artifacts: ContractArtifacts) -> Self {
        Self {
            backend,
            config,
            artifacts,
        }
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Load the checkpoint to resume from, or start a new one.
    ///
    /// With `fresh` set any stored progress is ignored and overwritten on
    /// the first completed step.
    pub fn load_checkpoint(
        &self,
        store: &CheckpointStore,
        fresh: bool,
    ) -> Result<Checkpoint, DeployError> {
        let node = self.config.chain_id;
        match store.load()? {
            Some(checkpoint) if !fresh => {
                if checkpoint.chain_id != node {
                    return Err(DeployError::ChainMismatch {
                        checkpoint: checkpoint.chain_id,
                        node,
                    });
                }
                Ok(checkpoint)
            }
            _ => Ok(Checkpoint::new(node)),
        }
    }

    /// Run every incomplete step in order, saving after each one.
    pub async fn run(
        &self,
        mut checkpoint: Checkpoint,
        store: &CheckpointStore,
    ) -> Result<Checkpoint, DeployError> {
        if checkpoint.is_finished() {
            info!(chain_id = checkpoint.chain_id, "Deployment already complete");
            return Ok(checkpoint);
        }
        if !checkpoint.completed.is_empty() {
            info!(
                chain_id = checkpoint.chain_id,
                completed = checkpoint.completed.len(),
                "Resuming deployment from checkpoint"
            );
        }

        while let Some(step) = checkpoint.next_step() {
            let outcome = self.execute(step, &mut checkpoint, store).await?;
            if let StepOutcome::Skipped { reason } = &outcome {
                warn!(step = %step, reason = %reason, "Step skipped");
            }
            checkpoint.record(step, outcome);
            store.save(&checkpoint)?;
            info!(step = %step, "Step completed");
        }

        Ok(checkpoint)
    }

    /// Run one step. The sent hash is saved as pending before waiting, and
    /// a pending hash left by an earlier run is awaited instead of sending
    /// the step again.
    async fn execute(
        &self,
        step: DeployStep,
        checkpoint: &mut Checkpoint,
        store: &CheckpointStore,
    ) -> Result<StepOutcome, DeployError> {
        let hash = match checkpoint.pending_for(step) {
            Some(hash) => {
                info!(step = %step, tx = %hash, "Awaiting transaction sent by an earlier run");
                hash
            }
            None => match self.send_step(step, checkpoint).await? {
                Some(hash) => {
                    checkpoint.set_pending(step, hash);
                    store.save(checkpoint)?;
                    hash
                }
                None => {
                    return Ok(StepOutcome::Skipped {
                        reason: format!("seeding disabled on chain {}", self.config.chain_id),
                    });
                }
            },
        };

        let receipt = self.confirm(step, hash, self.confirmations_for(step)).await?;
        match step {
            DeployStep::DeployToken => {
                let contract = self.deployed(step, TOKEN_CONTRACT, &receipt)?;
                checkpoint.contracts.insert(contract);
            }
            DeployStep::DeployExchange => {
                let contract = self.deployed(step, EXCHANGE_CONTRACT, &receipt)?;
                checkpoint.contracts.insert(contract);
            }
            DeployStep::InitExchange => {
                // init is mined at this point; the reserve is only reported
                let token = require(checkpoint, step, TOKEN_CONTRACT)?;
                let exchange = require(checkpoint, step, EXCHANGE_CONTRACT)?;
                match token_balance(self.backend.as_ref(), token, exchange).await {
                    Ok(reserve) => {
                        info!(exchange = %exchange, token_reserve = %reserve, "Exchange initialized")
                    }
                    Err(e) => {
                        warn!(exchange = %exchange, error = %e, "Failed to read exchange token reserve")
                    }
                }
            }
            DeployStep::SeedRecipient | DeployStep::ApproveExchange => {}
        }
        Ok(StepOutcome::Executed {
            transaction_hash: receipt.transaction_hash,
        })
    }

    /// Send the transaction of `step`; `None` when the step is skipped.
    async fn send_step(
        &self,
        step: DeployStep,
        checkpoint: &Checkpoint,
    ) -> Result<Option<B256>, DeployError> {
        let hash = match step {
            DeployStep::DeployToken => {
                self.process(DeployToken {
                    bytecode: self.artifacts.token.clone(),
                })
                .await?
            }
            DeployStep::DeployExchange => {
                let token = require(checkpoint, step, TOKEN_CONTRACT)?;
                self.process(DeployExchange {
                    bytecode: self.artifacts.exchange.clone(),
                    token,
                })
                .await?
            }
            DeployStep::SeedRecipient => match self.config.seed {
                SeedPolicy::Skip => return Ok(None),
                SeedPolicy::Transfer { recipient } => {
                    let token = require(checkpoint, step, TOKEN_CONTRACT)?;
                    self.process(SeedRecipient { token, recipient }).await?
                }
            },
            DeployStep::ApproveExchange => {
                let token = require(checkpoint, step, TOKEN_CONTRACT)?;
                let exchange = require(checkpoint, step, EXCHANGE_CONTRACT)?;
                self.process(ApproveExchange { token, exchange }).await?
            }
            DeployStep::InitExchange => {
                let exchange = require(checkpoint, step, EXCHANGE_CONTRACT)?;
                self.process(InitExchange { exchange }).await?
            }
        };
        Ok(Some(hash))
    }

    fn confirmations_for(&self, step: DeployStep) -> u64 {
        match step {
            DeployStep::DeployExchange => self.config.effective_exchange_confirmations(),
            _ => 1,
        }
    }

    async fn submit(&self, step: DeployStep, tx: TransactionRequest) -> Result<B256, DeployError> {
        let hash = self
            .backend
            .send_transaction(tx)
            .await
            .map_err(|source| DeployError::Step { step, source })?;
        info!(step = %step, tx = %hash, "Transaction sent");
        Ok(hash)
    }

    /// Wait until the transaction of `step` has `confirmations`.
    async fn confirm(
        &self,
        step: DeployStep,
        hash: B256,
        confirmations: u64,
    ) -> Result<TransactionReceipt, DeployError> {
        wait_for_confirmations(
            self.backend.as_ref(),
            hash,
            confirmations,
            self.config.confirmation,
        )
        .await
        .map_err(|source| DeployError::Step { step, source })
    }

    fn deployed(
        &self,
        step: DeployStep,
        name: &str,
        receipt: &TransactionReceipt,
    ) -> Result<DeployedContract, DeployError> {
        let address = receipt.contract_address.ok_or(DeployError::Step {
            step,
            source: ChainError::MissingContractAddress(receipt.transaction_hash),
        })?;
        info!(
            contract = name,
            address = %address,
            block = receipt.block(),
            "Contract deployed"
        );
        Ok(DeployedContract {
            name: name.to_string(),
            address,
            owner_account: self.config.deployer,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block(),
        })
    }
}

fn require(
    checkpoint: &Checkpoint,
    step: DeployStep,
    contract: &'static str,
) -> Result<Address, DeployError> {
    checkpoint
        .contracts
        .address_of(contract)
        .ok_or(DeployError::MissingPrerequisite { step, contract })
}

// ---------------------------------------------------------------------------
// Processor trait implementations
// ---------------------------------------------------------------------------

impl<B: ChainBackend> Processor<DeployToken> for DeploymentSequencer<B> {
    type Output = B256;
    type Error = DeployError;
    #[tracing::instrument(skip_all, err, name = "Deploy:Balloons")]
    async fn process(&self, msg: DeployToken) -> Result<B256, DeployError> {
        self.submit(DeployStep::DeployToken, msg.transaction(self.config.deployer))
            .await
    }
}

impl<B: ChainBackend> Processor<DeployExchange> for DeploymentSequencer<B> {
    type Output = B256;
    type Error = DeployError;
    #[tracing::instrument(skip_all, err, name = "Deploy:DEX")]
    async fn process(&self, msg: DeployExchange) -> Result<B256, DeployError> {
        info!(
            token = %msg.token,
            confirmations = self.config.effective_exchange_confirmations(),
            "Deploying exchange"
        );
        self.submit(DeployStep::DeployExchange, msg.transaction(self.config.deployer))
            .await
    }
}

impl<B: ChainBackend> Processor<SeedRecipient> for DeploymentSequencer<B> {
    type Output = B256;
    type Error = DeployError;
    #[tracing::instrument(skip_all, err, name = "Step:SeedRecipient")]
    async fn process(&self, msg: SeedRecipient) -> Result<B256, DeployError> {
        info!(
            recipient = %msg.recipient,
            amount = %seed_amount(),
            "Sending seed tokens"
        );
        self.submit(DeployStep::SeedRecipient, msg.transaction(self.config.deployer))
            .await
    }
}

impl<B: ChainBackend> Processor<ApproveExchange> for DeploymentSequencer<B> {
    type Output = B256;
    type Error = DeployError;
    #[tracing::instrument(skip_all, err, name = "Step:ApproveExchange")]
    async fn process(&self, msg: ApproveExchange) -> Result<B256, DeployError> {
        info!(
            exchange = %msg.exchange,
            amount = %approve_amount(),
            "Approving exchange to take tokens from the deployer"
        );
        self.submit(DeployStep::ApproveExchange, msg.transaction(self.config.deployer))
            .await
    }
}

impl<B: ChainBackend> Processor<InitExchange> for DeploymentSequencer<B> {
    type Output = B256;
    type Error = DeployError;
    #[tracing::instrument(skip_all, err, name = "Step:InitExchange")]
    async fn process(&self, msg: InitExchange) -> Result<B256, DeployError> {
        info!(
            exchange = %msg.exchange,
            tokens = %init_token_amount(),
            eth = %init_eth_value(),
            "Initializing exchange liquidity"
        );
        self.submit(DeployStep::InitExchange, msg.transaction(self.config.deployer))
            .await
    }
}
