//! Runtime configuration types.
//!
//! These are the validated values the sequencer and the event listener
//! run with. Loading and parsing the configuration file is handled by the
//! binary crate.

mod deployment;
mod listener;

pub use deployment::{DeploymentConfig, LOCAL_CHAIN_ID, SeedPolicy, default_seed_recipient};
pub use listener::ListenerConfig;
