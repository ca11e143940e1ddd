//! # Escrow Vault — Value Custody Accounting
//!
//! The vault is the ledger's internal balance table. `held` is the total
//! value in custody for pending licenses; `payable` is value already
//! released to a party by a resolution and claimable via
//! [`EscrowVault::withdraw`].
//!
//! ## Conservation Invariant
//!
//! Every unit of value attached to a request either stays in `held` or
//! moves, exactly once, into exactly one party's `payable` entry. Value is
//! never burned or duplicated. Vault mutations are all-or-nothing: both
//! checked operations of a release are computed before either side is
//! committed, so a returned error implies zero mutation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use caps_core::{AccountId, Amount};

use crate::ledger::LicensingError;

/// Internal balance table for escrowed and released value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EscrowVault {
    held: Amount,
    payable: BTreeMap<AccountId, Amount>,
}

impl EscrowVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take custody of `amount` for a newly pending license.
    pub fn hold(&mut self, amount: Amount) -> Result<(), LicensingError> {
        self.held = self
            .held
            .checked_add(amount)
            .ok_or(LicensingError::EscrowOverflow)?;
        Ok(())
    }

    /// Move `amount` out of custody into `account`'s claimable balance.
    ///
    /// Computes both sides before committing either; on error the vault is
    /// untouched. An underflow of `held` means the caller tried to release
    /// value that was never held — surfaced as `EscrowImbalance`, not a
    /// panic.
    pub fn release_to(
        &mut self,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), LicensingError> {
        let new_held = self
            .held
            .checked_sub(amount)
            .ok_or(LicensingError::EscrowImbalance)?;
        let current = self.payable.get(&account).copied().unwrap_or(Amount::ZERO);
        let new_payable = current
            .checked_add(amount)
            .ok_or(LicensingError::EscrowOverflow)?;

        self.held = new_held;
        self.payable.insert(account, new_payable);
        Ok(())
    }

    /// Total value currently in custody for pending licenses.
    pub fn held_total(&self) -> Amount {
        self.held
    }

    /// Value released to `account` and not yet withdrawn.
    pub fn withdrawable(&self, account: &AccountId) -> Amount {
        self.payable.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Drain `account`'s claimable balance, returning the amount paid out.
    pub fn withdraw(&mut self, account: &AccountId) -> Amount {
        self.payable.remove(account).unwrap_or(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 20])
    }

    #[test]
    fn test_hold_accumulates() {
        let mut vault = EscrowVault::new();
        vault.hold(Amount::new(100)).unwrap();
        vault.hold(Amount::new(50)).unwrap();
        assert_eq!(vault.held_total(), Amount::new(150));
    }

    #[test]
    fn test_release_moves_value_exactly_once() {
        let mut vault = EscrowVault::new();
        vault.hold(Amount::new(100)).unwrap();
        vault.release_to(account(0xA), Amount::new(100)).unwrap();
        assert_eq!(vault.held_total(), Amount::ZERO);
        assert_eq!(vault.withdrawable(&account(0xA)), Amount::new(100));

        // Releasing again without a matching hold is an imbalance.
        let err = vault.release_to(account(0xA), Amount::new(100)).unwrap_err();
        assert!(matches!(err, LicensingError::EscrowImbalance));
        assert_eq!(vault.withdrawable(&account(0xA)), Amount::new(100));
    }

    #[test]
    fn test_release_failure_leaves_vault_untouched() {
        let mut vault = EscrowVault::new();
        vault.hold(Amount::new(10)).unwrap();
        assert!(vault.release_to(account(0xA), Amount::new(20)).is_err());
        assert_eq!(vault.held_total(), Amount::new(10));
        assert_eq!(vault.withdrawable(&account(0xA)), Amount::ZERO);
    }

    #[test]
    fn test_hold_overflow() {
        let mut vault = EscrowVault::new();
        vault.hold(Amount::new(u128::MAX)).unwrap();
        let err = vault.hold(Amount::new(1)).unwrap_err();
        assert!(matches!(err, LicensingError::EscrowOverflow));
        assert_eq!(vault.held_total(), Amount::new(u128::MAX));
    }

    #[test]
    fn test_withdraw_drains_balance() {
        let mut vault = EscrowVault::new();
        vault.hold(Amount::new(70)).unwrap();
        vault.release_to(account(0xB), Amount::new(70)).unwrap();
        assert_eq!(vault.withdraw(&account(0xB)), Amount::new(70));
        assert_eq!(vault.withdraw(&account(0xB)), Amount::ZERO);
        assert_eq!(vault.withdrawable(&account(0xB)), Amount::ZERO);
    }

    #[test]
    fn test_withdrawable_unknown_account_is_zero() {
        let vault = EscrowVault::new();
        assert_eq!(vault.withdrawable(&account(0xC)), Amount::ZERO);
    }
}
