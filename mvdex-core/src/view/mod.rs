//! Plain-text rendering of the page header and event lists.

mod events;
mod header;

pub use events::{EventsView, HeaderLabel, short_address};
pub use header::{DEX_HEADER, PageHeader};
