//! The exchange's event kinds and their log decoding.

use super::{DecodeError, UnknownEvent};
use crate::contracts::IDex;
use alloy_primitives::{B256, U256};
use alloy_sol_types::SolEvent;
use mvdex_sdk::objects::{EntryId, EtherAmount, EventArg, EventEntry, RpcLog};
use std::fmt;
use std::str::FromStr;

/// Events emitted by the exchange contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DexEventKind {
    EthToTokenSwap,
    TokenToEthSwap,
    LiquidityProvided,
    LiquidityRemoved,
}

impl DexEventKind {
    pub const ALL: [DexEventKind; 4] = [
        DexEventKind::EthToTokenSwap,
        DexEventKind::TokenToEthSwap,
        DexEventKind::LiquidityProvided,
        DexEventKind::LiquidityRemoved,
    ];

    /// Event name as declared in the contract ABI.
    pub fn name(self) -> &'static str {
        match self {
            DexEventKind::EthToTokenSwap => "EthToTokenSwap",
            DexEventKind::TokenToEthSwap => "TokenToEthSwap",
            DexEventKind::LiquidityProvided => "LiquidityProvided",
            DexEventKind::LiquidityRemoved => "LiquidityRemoved",
        }
    }

    /// Column labels rendered above the event rows.
    pub fn header_label(self) -> &'static str {
        match self {
            DexEventKind::EthToTokenSwap => {
                "Ξ $ETH → 🎈 $BAL | Address | Trade | AmountIn | AmountOut"
            }
            DexEventKind::TokenToEthSwap => {
                "🎈 $BAL → Ξ $ETH | Address | Trade | AmountOut | AmountIn"
            }
            DexEventKind::LiquidityProvided => {
                "➕ Address | Liquidity Minted | Ξ $ETH in | 🎈 $BAL in"
            }
            DexEventKind::LiquidityRemoved => {
                "➖ Address | Liquidity Withdrawn | Ξ $ETH out | 🎈 $BAL out "
            }
        }
    }

    /// `topic0` of the event's logs.
    pub fn signature_hash(self) -> B256 {
        match self {
            DexEventKind::EthToTokenSwap => IDex::EthToTokenSwap::SIGNATURE_HASH,
            DexEventKind::TokenToEthSwap => IDex::TokenToEthSwap::SIGNATURE_HASH,
            DexEventKind::LiquidityProvided => IDex::LiquidityProvided::SIGNATURE_HASH,
            DexEventKind::LiquidityRemoved => IDex::LiquidityRemoved::SIGNATURE_HASH,
        }
    }

    /// Decode a log of this kind into an entry.
    ///
    /// The first argument is always the acting address. Swaps carry their
    /// trade description as text; liquidity events carry the minted or
    /// withdrawn liquidity as an amount.
    pub fn decode(self, log: &RpcLog) -> Result<EventEntry, DecodeError> {
        let topics = log.topics.iter().copied();
        let schema = |source| DecodeError::Schema { event: self, source };
        let args = match self {
            DexEventKind::EthToTokenSwap => {
                let e = IDex::EthToTokenSwap::decode_raw_log(topics, &log.data, true).map_err(schema)?;
                vec![
                    EventArg::Address(e.swapper),
                    EventArg::Text(e.txDetails),
                    amount(e.ethInput),
                    amount(e.tokenOutput),
                ]
            }
            DexEventKind::TokenToEthSwap => {
                let e = IDex::TokenToEthSwap::decode_raw_log(topics, &log.data, true).map_err(schema)?;
                vec![
                    EventArg::Address(e.swapper),
                    EventArg::Text(e.txDetails),
                    amount(e.tokensInput),
                    amount(e.ethOutput),
                ]
            }
            DexEventKind::LiquidityProvided => {
                let e = IDex::LiquidityProvided::decode_raw_log(topics, &log.data, true)
                    .map_err(schema)?;
                vec![
                    EventArg::Address(e.liquidityProvider),
                    amount(e.liquidityMinted),
                    amount(e.ethInput),
                    amount(e.tokensInput),
                ]
            }
            DexEventKind::LiquidityRemoved => {
                let e = IDex::LiquidityRemoved::decode_raw_log(topics, &log.data, true)
                    .map_err(schema)?;
                vec![
                    EventArg::Address(e.liquidityRemover),
                    amount(e.liquidityWithdrawn),
                    amount(e.ethOutput),
                    amount(e.tokensOutput),
                ]
            }
        };

        Ok(EventEntry {
            id: EntryId {
                transaction_hash: log.transaction_hash,
                log_index: log.log_index.to::<u64>(),
            },
            block_number: log.block_number.to::<u64>(),
            args,
        })
    }
}

fn amount(wei: U256) -> EventArg {
    EventArg::Amount(EtherAmount::from_wei(wei))
}

impl fmt::Display for DexEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DexEventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DexEventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, U64, address};
    use alloy_sol_types::SolEvent;

    pub(crate) const EXCHANGE: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    pub(crate) const PROVIDER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

    /// Build the log the exchange emits for `event`.
    pub(crate) fn log_of<E: SolEvent>(event: &E, block: u64, log_index: u64) -> RpcLog {
        let data = event.encode_log_data();
        RpcLog {
            address: EXCHANGE,
            topics: data.topics().to_vec(),
            data: Bytes::from(data.data.to_vec()),
            block_number: U64::from(block),
            transaction_hash: B256::with_last_byte(block as u8),
            log_index: U64::from(log_index),
            removed: false,
        }
    }

    pub(crate) fn liquidity_provided(minted: u64, eth: u64, tokens: u64) -> IDex::LiquidityProvided {
        IDex::LiquidityProvided {
            liquidityProvider: PROVIDER,
            liquidityMinted: EtherAmount::ether(minted).wei(),
            ethInput: EtherAmount::ether(eth).wei(),
            tokensInput: EtherAmount::ether(tokens).wei(),
        }
    }

    #[test]
    fn test_header_labels() {
        assert_eq!(
            DexEventKind::EthToTokenSwap.header_label(),
            "Ξ $ETH → 🎈 $BAL | Address | Trade | AmountIn | AmountOut"
        );
        assert_eq!(
            DexEventKind::TokenToEthSwap.header_label(),
            "🎈 $BAL → Ξ $ETH | Address | Trade | AmountOut | AmountIn"
        );
        assert_eq!(
            DexEventKind::LiquidityProvided.header_label(),
            "➕ Address | Liquidity Minted | Ξ $ETH in | 🎈 $BAL in"
        );
        assert_eq!(
            DexEventKind::LiquidityRemoved.header_label(),
            "➖ Address | Liquidity Withdrawn | Ξ $ETH out | 🎈 $BAL out "
        );
    }

    #[test]
    fn test_parse_event_names() {
        for kind in DexEventKind::ALL {
            assert_eq!(kind.name().parse::<DexEventKind>().unwrap(), kind);
        }
        assert_eq!(
            "Swap".parse::<DexEventKind>(),
            Err(UnknownEvent("Swap".to_string()))
        );
        assert!("liquidityremoved".parse::<DexEventKind>().is_err());
    }

    #[test]
    fn test_signature_hashes_are_distinct() {
        let hashes: std::collections::HashSet<B256> =
            DexEventKind::ALL.iter().map(|k| k.signature_hash()).collect();
        assert_eq!(hashes.len(), 4);
    }

    #[test]
    fn test_decode_swap_keeps_trade_text() {
        let event = IDex::EthToTokenSwap {
            swapper: PROVIDER,
            txDetails: "Eth to Balloons".to_string(),
            ethInput: EtherAmount::ether(1).wei(),
            tokenOutput: U256::from(996_006_981_039_903_216u64),
        };
        let entry = DexEventKind::EthToTokenSwap
            .decode(&log_of(&event, 7, 2))
            .unwrap();

        assert_eq!(entry.block_number, 7);
        assert_eq!(entry.id.log_index, 2);
        assert_eq!(entry.args[0], EventArg::Address(PROVIDER));
        assert_eq!(entry.args[1], EventArg::Text("Eth to Balloons".to_string()));
        assert_eq!(entry.args[3].to_string(), "0.9960");
    }

    #[test]
    fn test_decode_liquidity_tags_amounts() {
        let entry = DexEventKind::LiquidityProvided
            .decode(&log_of(&liquidity_provided(3, 2, 5), 4, 0))
            .unwrap();
        assert_eq!(entry.args[1], EventArg::Amount(EtherAmount::ether(3)));
        assert_eq!(entry.args[2], EventArg::Amount(EtherAmount::ether(2)));
        assert_eq!(entry.args[3], EventArg::Amount(EtherAmount::ether(5)));
    }

    #[test]
    fn test_decode_rejects_other_event() {
        let log = log_of(&liquidity_provided(1, 1, 1), 1, 0);
        assert!(matches!(
            DexEventKind::LiquidityRemoved.decode(&log),
            Err(DecodeError::Schema {
                event: DexEventKind::LiquidityRemoved,
                ..
            })
        ));
    }
}
