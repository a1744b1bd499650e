//! Shared types for the Minimum Viable DEX tooling.
//!
//! The `objects` module holds the wire and registry types used by both
//! the deployment sequencer and the event view. The typed JSON-RPC client
//! lives behind the `client` feature.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
