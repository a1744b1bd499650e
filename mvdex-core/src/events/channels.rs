//! Feed channel factory.
//!
//! The listener publishes whole snapshots; a receiver always sees the
//! latest feed and never a partially updated one.

use super::feed::EventFeed;
use tokio::sync::watch;

/// Sender handle for feed snapshots.
pub type EventFeedSender = watch::Sender<EventFeed>;
/// Receiver handle for feed snapshots.
pub type EventFeedReceiver = watch::Receiver<EventFeed>;

/// Create a feed channel holding an empty feed.
pub fn event_feed_channel() -> (EventFeedSender, EventFeedReceiver) {
    watch::channel(EventFeed::default())
}
