//! The event list: a title, the column labels of the event kind and one
//! row per feed entry.

use crate::events::{DexEventKind, EventFeed};
use alloy_primitives::Address;
use itertools::Itertools;
use mvdex_sdk::objects::{EventArg, EventEntry};
use std::fmt;
use tracing::warn;

/// Column labels for an event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLabel {
    Known(DexEventKind),
    /// A name outside the exchange's events. Rendered as a warning, never
    /// as the labels of another event.
    Unknown(String),
}

impl HeaderLabel {
    pub fn for_event(name: &str) -> Self {
        match name.parse() {
            Ok(kind) => HeaderLabel::Known(kind),
            Err(_) => {
                warn!(event = name, "No column labels for unknown event");
                HeaderLabel::Unknown(name.to_string())
            }
        }
    }
}

impl fmt::Display for HeaderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderLabel::Known(kind) => f.write_str(kind.header_label()),
            HeaderLabel::Unknown(name) => write!(f, "⚠️ Unknown event {name:?}"),
        }
    }
}

/// `0x` plus the first four and last four checksummed hex digits.
pub fn short_address(address: Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

fn render_arg(arg: &EventArg) -> String {
    match arg {
        EventArg::Address(address) => short_address(*address),
        other => other.to_string(),
    }
}

/// Render one entry as ` | `-separated columns.
pub fn render_row(entry: &EventEntry) -> String {
    entry.args.iter().map(render_arg).join(" | ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsView {
    event_name: String,
    label: HeaderLabel,
}

impl EventsView {
    pub fn new(event_name: &str) -> Self {
        Self {
            event_name: event_name.to_string(),
            label: HeaderLabel::for_event(event_name),
        }
    }

    pub fn label(&self) -> &HeaderLabel {
        &self.label
    }

    pub fn render(&self, feed: &EventFeed) -> String {
        let mut out = format!("{} events\n{}", self.event_name, self.label);
        for entry in feed.iter() {
            out.push('\n');
            out.push_str(&render_row(entry));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::kind_tests::{PROVIDER, liquidity_provided, log_of};
    use alloy_primitives::B256;
    use mvdex_sdk::objects::{EntryId, EtherAmount};

    #[test]
    fn test_header_label_for_known_events() {
        for kind in DexEventKind::ALL {
            assert_eq!(HeaderLabel::for_event(kind.name()), HeaderLabel::Known(kind));
        }
    }

    #[test]
    fn test_unknown_event_is_not_the_withdrawal_label() {
        let label = HeaderLabel::for_event("Transfer");
        assert_eq!(label, HeaderLabel::Unknown("Transfer".to_string()));
        assert_ne!(
            label.to_string(),
            DexEventKind::LiquidityRemoved.header_label()
        );
        assert_eq!(label.to_string(), "⚠️ Unknown event \"Transfer\"");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address(PROVIDER), "0x7099...79C8");
    }

    #[test]
    fn test_liquidity_rows_render_in_block_order() {
        let kind = DexEventKind::LiquidityProvided;
        let mut feed = EventFeed::new();
        for (block, minted) in [(12, 3), (5, 1), (9, 2)] {
            let log = log_of(&liquidity_provided(minted, minted, minted * 2), block, 0);
            feed.insert(kind.decode(&log).unwrap());
        }

        let rendered = EventsView::new("LiquidityProvided").render(&feed);
        assert_eq!(
            rendered,
            "LiquidityProvided events\n\
             ➕ Address | Liquidity Minted | Ξ $ETH in | 🎈 $BAL in\n\
             0x7099...79C8 | 1.0000 | 1.0000 | 2.0000\n\
             0x7099...79C8 | 2.0000 | 2.0000 | 4.0000\n\
             0x7099...79C8 | 3.0000 | 3.0000 | 6.0000"
        );
    }

    #[test]
    fn test_swap_row_renders_trade_text() {
        let entry = EventEntry {
            id: EntryId {
                transaction_hash: B256::repeat_byte(1),
                log_index: 0,
            },
            block_number: 3,
            args: vec![
                EventArg::Address(PROVIDER),
                EventArg::Text("Balloons to ETH".to_string()),
                EventArg::Amount(EtherAmount::ether(1)),
                EventArg::Amount("0.4995".parse().unwrap()),
            ],
        };
        assert_eq!(
            render_row(&entry),
            "0x7099...79C8 | Balloons to ETH | 1.0000 | 0.4995"
        );
    }

    #[test]
    fn test_entries_sharing_block_and_address_stay_distinct() {
        let kind = DexEventKind::LiquidityProvided;
        let mut feed = EventFeed::new();
        feed.insert(kind.decode(&log_of(&liquidity_provided(1, 1, 1), 4, 0)).unwrap());
        feed.insert(kind.decode(&log_of(&liquidity_provided(2, 2, 2), 4, 1)).unwrap());

        let rendered = EventsView::new("LiquidityProvided").render(&feed);
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn test_unknown_event_view() {
        let view = EventsView::new("Swap");
        assert_eq!(
            view.render(&EventFeed::new()),
            "Swap events\n⚠️ Unknown event \"Swap\""
        );
    }
}
