//! Compiled contract artifacts.
//!
//! Accepts both Hardhat artifacts (`"bytecode": "0x…"`) and Foundry
//! artifacts (`"bytecode": { "object": "0x…" }`).

use alloy_primitives::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("artifact {0:?} has empty bytecode (abstract contract or interface?)")]
    EmptyBytecode(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(Bytes),
    Object { object: Bytes },
}

#[derive(Deserialize)]
struct Artifact {
    bytecode: BytecodeField,
}

/// Creation bytecode of the two contracts the sequencer deploys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifacts {
    pub token: Bytes,
    pub exchange: Bytes,
}

impl ContractArtifacts {
    pub fn load(token: impl AsRef<Path>, exchange: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        Ok(Self {
            token: load_bytecode(token)?,
            exchange: load_bytecode(exchange)?,
        })
    }
}

/// Parse the creation bytecode out of an artifact JSON string.
pub fn parse_bytecode(json: &str) -> Result<Bytes, serde_json::Error> {
    let artifact: Artifact = serde_json::from_str(json)?;
    Ok(match artifact.bytecode {
        BytecodeField::Hex(code) => code,
        BytecodeField::Object { object } => object,
    })
}

/// Read the creation bytecode from the artifact at `path`.
pub fn load_bytecode(path: impl AsRef<Path>) -> Result<Bytes, ArtifactError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let code = parse_bytecode(&json).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if code.is_empty() {
        return Err(ArtifactError::EmptyBytecode(path.to_path_buf()));
    }
    Ok(code)
}
