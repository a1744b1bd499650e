//! Decoded event entries.
//!
//! Arguments carry a declared kind tag taken from the event schema, so the
//! view never has to guess how to render a value from its string form.

use super::amount::EtherAmount;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a log entry: the transaction it was emitted in and
/// its index within the block. Unique for every log on a canonical chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryId {
    pub transaction_hash: B256,
    pub log_index: u64,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.transaction_hash, self.log_index)
    }
}

/// A single event argument tagged with its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EventArg {
    Address(Address),
    Amount(EtherAmount),
    Text(String),
}

impl EventArg {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            EventArg::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<EtherAmount> {
        match self {
            EventArg::Amount(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventArg::Address(a) => write!(f, "{}", a.to_checksum(None)),
            EventArg::Amount(v) => write!(f, "{v}"),
            EventArg::Text(s) => f.write_str(s),
        }
    }
}

/// A decoded log entry. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub id: EntryId,
    pub block_number: u64,
    pub args: Vec<EventArg>,
}

impl EventEntry {
    /// Ordering key of the entry within the feed.
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.id.log_index)
    }
}
