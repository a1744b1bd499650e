//! Event listener configuration.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    /// First block scanned for logs.
    pub start_block: u64,
    /// Delay between `eth_getLogs` polls.
    pub poll_interval: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            start_block: 1,
            poll_interval: Duration::from_secs(1),
        }
    }
}
