//! Ether-denominated amounts.
//!
//! Every amount that crosses the deployment or transfer boundary is an
//! integer of base units scaled by 10^18. Human-readable decimals enter
//! through [`EtherAmount::from_ether`] and nowhere else.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base units per whole token (10^18).
pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Number of fractional digits shown when displaying a balance.
const DISPLAY_DECIMALS: u32 = 4;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AmountError {
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),
    #[error("amount has more than 18 fractional digits: {0}")]
    TooPrecise(Decimal),
    #[error("amount is too large: {0}")]
    Overflow(Decimal),
    #[error("invalid decimal: {0}")]
    Parse(#[from] rust_decimal::Error),
}

/// An amount of base units scaled by 10^18.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EtherAmount(U256);

impl EtherAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw base-unit value.
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// `whole` tokens, i.e. `whole * 10^18` base units.
    pub fn ether(whole: u64) -> Self {
        Self(U256::from(whole) * WEI_PER_ETHER)
    }

    /// Convert a decimal token quantity (e.g. `0.02`) into base units.
    pub fn from_ether(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        let scaled = value
            .checked_mul(Decimal::from(1_000_000_000_000_000_000u64))
            .ok_or(AmountError::Overflow(value))?;
        if !scaled.fract().is_zero() {
            return Err(AmountError::TooPrecise(value));
        }
        let wei = scaled.to_u128().ok_or(AmountError::Overflow(value))?;
        Ok(Self(U256::from(wei)))
    }

    pub fn wei(self) -> U256 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl From<U256> for EtherAmount {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl FromStr for EtherAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ether(Decimal::from_str(s.trim())?)
    }
}

/// Formats as whole tokens with four fractional digits, truncated.
impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_ETHER;
        let unit = U256::from(10u64.pow(18 - DISPLAY_DECIMALS));
        let frac = (self.0 % WEI_PER_ETHER) / unit;
        write!(
            f,
            "{whole}.{:0width$}",
            frac.as_limbs()[0],
            width = DISPLAY_DECIMALS as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ether_scaling() {
        assert_eq!(
            EtherAmount::ether(10).wei(),
            U256::from(10_000_000_000_000_000_000u128)
        );
        assert_eq!(
            "0.02".parse::<EtherAmount>().unwrap().wei(),
            U256::from(20_000_000_000_000_000u128)
        );
        assert_eq!("100".parse::<EtherAmount>().unwrap(), EtherAmount::ether(100));
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        assert!(matches!(
            "-1".parse::<EtherAmount>(),
            Err(AmountError::Negative(_))
        ));
        assert!(matches!(
            "0.0000000000000000001".parse::<EtherAmount>(),
            Err(AmountError::TooPrecise(_))
        ));
        assert!(matches!(
            "abc".parse::<EtherAmount>(),
            Err(AmountError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_errors_compare_by_value() {
        assert_eq!(
            "-1".parse::<EtherAmount>(),
            Err(AmountError::Negative(Decimal::NEGATIVE_ONE))
        );
        let garbage = "abc".parse::<EtherAmount>();
        assert_eq!(garbage, "abc".parse::<EtherAmount>());
        assert_ne!(garbage, "-1".parse::<EtherAmount>());
    }

    #[test]
    fn test_display_truncates_to_four_places() {
        assert_eq!(EtherAmount::ether(10).to_string(), "10.0000");
        assert_eq!("0.02".parse::<EtherAmount>().unwrap().to_string(), "0.0200");
        assert_eq!(
            "1.23456789".parse::<EtherAmount>().unwrap().to_string(),
            "1.2345"
        );
        assert_eq!(EtherAmount::ZERO.to_string(), "0.0000");
    }

    #[test]
    fn test_checked_arithmetic() {
        let ten = EtherAmount::ether(10);
        let one = EtherAmount::ether(1);
        assert_eq!(ten.checked_sub(one), Some(EtherAmount::ether(9)));
        assert_eq!(one.checked_sub(ten), None);
        assert_eq!(ten.checked_add(one), Some(EtherAmount::ether(11)));
    }
}
