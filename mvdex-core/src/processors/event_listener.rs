//! EventListener processor.
//!
//! The EventListener is responsible for:
//! - Polling `eth_getLogs` for one exchange event from a start block
//! - Decoding each log into a tagged [`EventEntry`]
//! - Rejecting re-delivered entries by their entry id
//! - Publishing the whole feed through a watch channel after every change
//!
//! Poll failures are logged and the listener keeps polling until shutdown.

use crate::chain::{ChainBackend, ChainError};
use crate::config::ListenerConfig;
use crate::events::{DexEventKind, EventFeed, EventFeedSender, Insertion};
use alloy_primitives::Address;
use kanau::processor::Processor;
use mvdex_sdk::objects::{BlockTag, EventEntry, LogFilter};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),
}

/// Request to fetch the logs of blocks `from..=latest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPoll {
    pub from: u64,
}

/// Entries decoded from one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBatch {
    pub entries: Vec<EventEntry>,
    /// Last block included in the poll.
    pub to: u64,
}

pub struct EventListener<B: ChainBackend> {
    backend: Arc<B>,
    contract: Address,
    kind: DexEventKind,
    config: ListenerConfig,
    feed_tx: EventFeedSender,
}

impl<B: ChainBackend> EventListener<B> {
    pub fn new(
        backend: Arc<B>,
        contract: Address,
        kind: DexEventKind,
        config: ListenerConfig,
        feed_tx: EventFeedSender,
    ) -> Self {
        Self {
            backend,
            contract,
            kind,
            config,
            feed_tx,
        }
    }

    /// Poll once from the start block and publish the resulting feed.
    pub async fn fetch_once(&self) -> Result<EventFeed, ListenError> {
        let mut feed = EventFeed::new();
        if let Some(batch) = self
            .process(LogPoll {
                from: self.config.start_block,
            })
            .await?
        {
            self.merge(&mut feed, batch.entries);
        }
        self.feed_tx.send_replace(feed.clone());
        Ok(feed)
    }

    /// Run the polling loop until shutdown or until every feed receiver
    /// is dropped.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut feed = EventFeed::new();
        let mut next_block = self.config.start_block;
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            contract = %self.contract,
            event = %self.kind,
            start_block = next_block,
            "EventListener started"
        );

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("EventListener received shutdown signal");
                        break;
                    }
                }

                _ = interval.tick() => {
                    if self.feed_tx.is_closed() {
                        info!("All feed receivers dropped");
                        break;
                    }
                    match self.process(LogPoll { from: next_block }).await {
                        Ok(Some(batch)) => {
                            next_block = batch.to + 1;
                            if self.merge(&mut feed, batch.entries) > 0 {
                                self.feed_tx.send_replace(feed.clone());
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            error!(error = %e, from = next_block, "Log poll failed");
                        }
                    }
                }
            }
        }

        info!("EventListener shutdown complete");
    }

    /// Add entries to `feed`, returning how many were new.
    fn merge(&self, feed: &mut EventFeed, entries: Vec<EventEntry>) -> usize {
        let mut inserted = 0;
        for entry in entries {
            match feed.insert(entry) {
                Insertion::Inserted => inserted += 1,
                Insertion::Duplicate(id) => {
                    warn!(event = %self.kind, entry = %id, "Duplicate event entry ignored");
                }
            }
        }
        inserted
    }
}

impl<B: ChainBackend> Processor<LogPoll> for EventListener<B> {
    type Output = Option<LogBatch>;
    type Error = ListenError;
    #[tracing::instrument(skip_all, err, name = "Listen:LogPoll")]
    async fn process(&self, msg: LogPoll) -> Result<Option<LogBatch>, ListenError> {
        let latest = self.backend.block_number().await?;
        if latest < msg.from {
            return Ok(None);
        }

        let filter = LogFilter::event(
            self.contract,
            self.kind.signature_hash(),
            msg.from,
            BlockTag::Number(latest),
        );
        let logs = self.backend.logs(filter).await?;

        let mut entries = Vec::with_capacity(logs.len());
        for log in logs {
            if log.removed {
                debug!(tx = %log.transaction_hash, "Skipping removed log");
                continue;
            }
            match self.kind.decode(&log) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    tx = %log.transaction_hash,
                    error = %e,
                    "Failed to decode event log"
                ),
            }
        }

        debug!(
            event = %self.kind,
            from = msg.from,
            to = latest,
            entries = entries.len(),
            "Polled event logs"
        );
        Ok(Some(LogBatch {
            entries,
            to: latest,
        }))
    }
}
