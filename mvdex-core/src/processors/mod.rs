//! Processors driving the two flows of the tool.
//!
//! - `DeploymentSequencer`: deploys and wires the token and exchange
//!   contracts, one checkpointed step at a time
//! - `EventListener`: polls exchange logs and publishes the decoded feed

pub mod deployment;
pub mod event_listener;

pub use deployment::{DeployError, DeployStep, DeploymentSequencer, resolve_deployer};
pub use event_listener::{EventListener, ListenError};
