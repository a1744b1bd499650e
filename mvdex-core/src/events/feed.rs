//! The ordered, de-duplicated list of entries for one event stream.

use mvdex_sdk::objects::{EntryId, EventEntry};
use std::collections::HashSet;

/// Outcome of adding an entry to a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// An entry with this id is already in the feed; nothing changed.
    Duplicate(EntryId),
}

/// Entries ordered by ascending (block number, log index).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFeed {
    entries: Vec<EventEntry>,
    ids: HashSet<EntryId>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: EventEntry) -> Insertion {
        if !self.ids.insert(entry.id) {
            return Insertion::Duplicate(entry.id);
        }
        let at = self
            .entries
            .partition_point(|e| e.position() <= entry.position());
        self.entries.insert(at, entry);
        Insertion::Inserted
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    pub fn entries(&self) -> &[EventEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter()
    }
}
