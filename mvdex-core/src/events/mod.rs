//! Exchange events: the closed set of event kinds, log decoding and the
//! ordered feed published by the listener.

mod channels;
mod feed;
mod kind;

pub use channels::{EventFeedReceiver, EventFeedSender, event_feed_channel};
pub use feed::{EventFeed, Insertion};
pub use kind::DexEventKind;

#[cfg(test)]
pub(crate) use kind::tests as kind_tests;

use thiserror::Error;

/// A log that does not match the schema of the event it was fetched for.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("log does not match the {event} schema: {source}")]
    Schema {
        event: DexEventKind,
        #[source]
        source: alloy_sol_types::Error,
    },
}

/// An event name outside the exchange's event set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event {0:?}, expected one of EthToTokenSwap, TokenToEthSwap, LiquidityProvided, LiquidityRemoved")]
pub struct UnknownEvent(pub String);
