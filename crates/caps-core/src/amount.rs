//! # Escrow Amounts
//!
//! `Amount` is the unit of value held in escrow and released on license
//! resolution. Only checked arithmetic is exposed — escrow bookkeeping
//! must surface arithmetic faults as errors, never wrap silently.

use serde::{Deserialize, Serialize};

/// A quantity of value in the ledger's smallest unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw value.
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// The raw value.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction; `None` on underflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
        assert_eq!(
            Amount::new(1).checked_add(Amount::new(2)),
            Some(Amount::new(3))
        );
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert_eq!(Amount::new(1).checked_sub(Amount::new(2)), None);
        assert_eq!(
            Amount::new(5).checked_sub(Amount::new(2)),
            Some(Amount::new(3))
        );
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Amount::new(100)).unwrap();
        assert_eq!(json, "100");
        let parsed: Amount = serde_json::from_str("100").unwrap();
        assert_eq!(parsed, Amount::new(100));
    }

    proptest! {
        #[test]
        fn prop_add_then_sub_is_identity(a in any::<u64>(), b in any::<u64>()) {
            // u64 inputs cannot overflow u128 addition.
            let sum = Amount::new(a as u128).checked_add(Amount::new(b as u128)).unwrap();
            let back = sum.checked_sub(Amount::new(b as u128)).unwrap();
            prop_assert_eq!(back, Amount::new(a as u128));
        }
    }
}
