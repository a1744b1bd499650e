//! Deployment checkpoints.
//!
//! After every sequencer step the checkpoint (contract registry plus the
//! completed steps) is written to disk, so an interrupted run resumes at
//! the first incomplete step instead of redeploying. A step's transaction
//! hash is stored as pending as soon as it is sent, so a run that dies
//! while waiting for confirmations awaits that same transaction on resume.

use crate::processors::deployment::DeployStep;
use alloy_primitives::B256;
use mvdex_sdk::objects::ContractRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to access checkpoint file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse checkpoint file: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a step finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Executed {
        #[serde(rename = "transactionHash")]
        transaction_hash: B256,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step: DeployStep,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

/// A step transaction that was sent but not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    pub step: DeployStep,
    pub transaction_hash: B256,
}

/// Progress of a deployment on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub chain_id: u64,
    #[serde(default)]
    pub contracts: ContractRegistry,
    #[serde(default)]
    pub completed: Vec<StepRecord>,
    /// Sent transaction of the next step, awaited again on resume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingTransaction>,
}

impl Checkpoint {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            contracts: ContractRegistry::new(),
            completed: Vec::new(),
            pending: None,
        }
    }

    pub fn is_complete(&self, step: DeployStep) -> bool {
        self.completed.iter().any(|r| r.step == step)
    }

    /// The first step in sequence order that has not completed.
    pub fn next_step(&self) -> Option<DeployStep> {
        DeployStep::ALL.into_iter().find(|s| !self.is_complete(*s))
    }

    pub fn is_finished(&self) -> bool {
        self.next_step().is_none()
    }

    pub fn set_pending(&mut self, step: DeployStep, transaction_hash: B256) {
        self.pending = Some(PendingTransaction {
            step,
            transaction_hash,
        });
    }

    /// Hash of the unconfirmed transaction already sent for `step`.
    pub fn pending_for(&self, step: DeployStep) -> Option<B256> {
        self.pending
            .filter(|p| p.step == step)
            .map(|p| p.transaction_hash)
    }

    pub fn record(&mut self, step: DeployStep, outcome: StepOutcome) {
        self.pending = None;
        self.completed.push(StepRecord {
            step,
            outcome,
            completed_at: OffsetDateTime::now_utc(),
        });
    }
}

/// JSON file holding a [`Checkpoint`].
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored checkpoint, `None` if no file exists yet.
    pub fn load(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let json = serde_json::to_string_pretty(checkpoint)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write atomically: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    pub fn remove(&self) -> Result<(), CheckpointError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
