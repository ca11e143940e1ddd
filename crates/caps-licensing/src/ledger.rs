//! # Licensing Ledger
//!
//! The per-(fingerprint, licensee) license table, its escrow vault, and
//! the administrator circuit breaker. Ownership is read live from a
//! [`CapsuleDirectory`] on every authorization decision; the ledger never
//! writes to the registry.
//!
//! Every mutating operation validates all preconditions and performs all
//! fallible arithmetic before committing any state change — a returned
//! error implies zero mutation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use caps_core::{AccountId, Amount, CapsuleLocator, ContentFingerprint};
use caps_registry::CapsuleDirectory;

use crate::license::{License, LicenseState};
use crate::vault::EscrowVault;

// ─── Events ──────────────────────────────────────────────────────────

/// Audit notifications emitted by the ledger, in operation order.
///
/// `owner` is the capsule owner at the time of the operation, read live
/// from the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A license was requested and its payment escrowed.
    LicenseRequested {
        /// The capsule the request targets.
        fingerprint: ContentFingerprint,
        /// The capsule owner at request time.
        owner: AccountId,
        /// The requesting principal.
        licensee: AccountId,
    },
    /// A pending license was approved; escrow released to the owner.
    LicenseApproved {
        /// The capsule the license targets.
        fingerprint: ContentFingerprint,
        /// The approving owner.
        owner: AccountId,
        /// The licensee.
        licensee: AccountId,
    },
    /// A pending license was refused; escrow returned to the licensee.
    LicenseRefused {
        /// The capsule the license targets.
        fingerprint: ContentFingerprint,
        /// The refusing owner.
        owner: AccountId,
        /// The licensee.
        licensee: AccountId,
    },
    /// A pending license was cancelled by its licensee; escrow returned.
    LicenseCancelled {
        /// The capsule the license targeted.
        fingerprint: ContentFingerprint,
        /// The cancelling licensee.
        licensee: AccountId,
    },
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by ledger operations.
///
/// Every failure aborts the whole operation with no partial effect, and
/// every failure is recoverable by the caller choosing different
/// arguments or waiting for a precondition to change.
#[derive(Error, Debug)]
pub enum LicensingError {
    /// The circuit breaker is engaged; mutating operations are disabled.
    #[error("contract is halted")]
    ContractHalted,

    /// The caller lacks the required role (capsule owner or administrator).
    #[error("caller {caller} is not authorized")]
    NotAuthorized {
        /// The rejected caller.
        caller: AccountId,
    },

    /// No capsule is registered for the fingerprint.
    #[error("no capsule registered for fingerprint {fingerprint}")]
    UnknownCapsule {
        /// The unregistered fingerprint.
        fingerprint: ContentFingerprint,
    },

    /// No pending request exists for the (fingerprint, licensee) pair.
    #[error("no pending license request for fingerprint {fingerprint} and licensee {licensee}")]
    NoSuchRequest {
        /// The capsule fingerprint.
        fingerprint: ContentFingerprint,
        /// The licensee.
        licensee: AccountId,
    },

    /// A request for the pair is already pending; it must be resolved
    /// before a new one can escrow value.
    #[error("a license request is already pending for fingerprint {fingerprint} and licensee {licensee}")]
    RequestAlreadyPending {
        /// The capsule fingerprint.
        fingerprint: ContentFingerprint,
        /// The licensee.
        licensee: AccountId,
    },

    /// Escrow arithmetic would overflow.
    #[error("escrow accounting overflow")]
    EscrowOverflow,

    /// A release exceeded the value in custody. Indicates an internal
    /// invariant breach; surfaced as an error rather than a panic.
    #[error("escrow release exceeds held custody")]
    EscrowImbalance,
}

// ─── Listings ────────────────────────────────────────────────────────

/// One licensable capsule in a [`LicensingLedger::licensable_capsules`]
/// result: the fingerprint to request against plus the full locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// The capsule's registry key.
    pub fingerprint: ContentFingerprint,
    /// The capsule's external storage pointer.
    pub locator: CapsuleLocator,
}

// ─── The Ledger ──────────────────────────────────────────────────────

/// License state machine with escrowed payment and a circuit breaker.
///
/// The administrator identity is fixed at construction and cannot be
/// reassigned. License records are kept after resolution as an audit
/// surface; a fresh request for a resolved pair starts a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensingLedger {
    admin: AccountId,
    halted: bool,
    licenses: BTreeMap<ContentFingerprint, BTreeMap<AccountId, License>>,
    vault: EscrowVault,
    events: Vec<LedgerEvent>,
}

impl LicensingLedger {
    /// Create a ledger administered by `admin`.
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            halted: false,
            licenses: BTreeMap::new(),
            vault: EscrowVault::new(),
            events: Vec::new(),
        }
    }

    // ── Circuit breaker ──────────────────────────────────────────────

    /// The administrator identity fixed at construction.
    pub fn administrator(&self) -> AccountId {
        self.admin
    }

    /// Whether the circuit breaker is engaged.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Engage the circuit breaker. Administrator only; idempotent —
    /// stopping an already-halted ledger succeeds without effect.
    pub fn stop(&mut self, caller: AccountId) -> Result<(), LicensingError> {
        self.require_admin(caller)?;
        self.halted = true;
        Ok(())
    }

    /// Disengage the circuit breaker. Administrator only; idempotent —
    /// resuming a running ledger succeeds without effect.
    pub fn resume(&mut self, caller: AccountId) -> Result<(), LicensingError> {
        self.require_admin(caller)?;
        self.halted = false;
        Ok(())
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// Every registered capsule not owned by `caller`, in registration
    /// order. Available while halted — this is a pure read.
    pub fn licensable_capsules(
        &self,
        directory: &impl CapsuleDirectory,
        caller: AccountId,
    ) -> Vec<Listing> {
        directory
            .fingerprints()
            .iter()
            .filter_map(|fingerprint| {
                let capsule = directory.capsule(fingerprint);
                (capsule.owner != caller).then_some(Listing {
                    fingerprint: *fingerprint,
                    locator: capsule.locator,
                })
            })
            .collect()
    }

    // ── License lifecycle ────────────────────────────────────────────

    /// Request a license for `fingerprint`, escrowing `attached`.
    ///
    /// The owner may request against their own capsule. A fresh request
    /// for a pair whose prior license is resolved overwrites the terminal
    /// record; a request while one is still pending is rejected, so a
    /// pair can never hold escrow twice.
    pub fn request_license(
        &mut self,
        directory: &impl CapsuleDirectory,
        fingerprint: ContentFingerprint,
        attached: Amount,
        caller: AccountId,
    ) -> Result<LedgerEvent, LicensingError> {
        self.require_running()?;

        let owner = directory.owner_of(&fingerprint);
        if owner.is_zero() {
            return Err(LicensingError::UnknownCapsule { fingerprint });
        }
        if self.license_state(&fingerprint, &caller).is_pending() {
            return Err(LicensingError::RequestAlreadyPending {
                fingerprint,
                licensee: caller,
            });
        }

        self.vault.hold(attached)?;
        self.licenses
            .entry(fingerprint)
            .or_default()
            .insert(caller, License::requested(attached));

        Ok(self.emit(LedgerEvent::LicenseRequested {
            fingerprint,
            owner,
            licensee: caller,
        }))
    }

    /// Approve the pending request of `licensee` on `fingerprint`,
    /// releasing its escrow to the caller (the capsule owner).
    pub fn approve_license_request(
        &mut self,
        directory: &impl CapsuleDirectory,
        fingerprint: ContentFingerprint,
        licensee: AccountId,
        caller: AccountId,
    ) -> Result<LedgerEvent, LicensingError> {
        let owner = self.resolve_as_owner(directory, fingerprint, licensee, caller)?;
        self.settle(fingerprint, licensee, LicenseState::Approved, owner)?;
        Ok(self.emit(LedgerEvent::LicenseApproved {
            fingerprint,
            owner,
            licensee,
        }))
    }

    /// Refuse the pending request of `licensee` on `fingerprint`,
    /// returning its escrow to the licensee.
    pub fn refuse_license_request(
        &mut self,
        directory: &impl CapsuleDirectory,
        fingerprint: ContentFingerprint,
        licensee: AccountId,
        caller: AccountId,
    ) -> Result<LedgerEvent, LicensingError> {
        let owner = self.resolve_as_owner(directory, fingerprint, licensee, caller)?;
        self.settle(fingerprint, licensee, LicenseState::Refused, licensee)?;
        Ok(self.emit(LedgerEvent::LicenseRefused {
            fingerprint,
            owner,
            licensee,
        }))
    }

    /// Cancel the caller's own pending request on `fingerprint`,
    /// returning its escrow. Only the licensee may cancel.
    pub fn cancel_license_request(
        &mut self,
        fingerprint: ContentFingerprint,
        caller: AccountId,
    ) -> Result<LedgerEvent, LicensingError> {
        self.require_running()?;
        self.settle(fingerprint, caller, LicenseState::Cancelled, caller)?;
        Ok(self.emit(LedgerEvent::LicenseCancelled {
            fingerprint,
            licensee: caller,
        }))
    }

    // ── Queries (never gated by the circuit breaker) ─────────────────

    /// State of the license for the pair; `LicenseState::None` if no
    /// record exists. Never fails.
    pub fn license_state(
        &self,
        fingerprint: &ContentFingerprint,
        licensee: &AccountId,
    ) -> LicenseState {
        self.license(fingerprint, licensee)
            .map(|l| l.state)
            .unwrap_or(LicenseState::None)
    }

    /// The license record for the pair, if one exists.
    pub fn license(
        &self,
        fingerprint: &ContentFingerprint,
        licensee: &AccountId,
    ) -> Option<&License> {
        self.licenses.get(fingerprint).and_then(|by| by.get(licensee))
    }

    /// Total value in custody for pending licenses.
    pub fn escrowed_total(&self) -> Amount {
        self.vault.held_total()
    }

    /// Value released to `account` by resolutions and not yet withdrawn.
    pub fn withdrawable(&self, account: &AccountId) -> Amount {
        self.vault.withdrawable(account)
    }

    /// Drain `account`'s released balance, returning the amount paid out.
    pub fn withdraw(&mut self, account: &AccountId) -> Amount {
        self.vault.withdraw(account)
    }

    /// The audit log of emitted events, in operation order.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // ── Internals ────────────────────────────────────────────────────

    fn require_admin(&self, caller: AccountId) -> Result<(), LicensingError> {
        if caller != self.admin {
            return Err(LicensingError::NotAuthorized { caller });
        }
        Ok(())
    }

    fn require_running(&self) -> Result<(), LicensingError> {
        if self.halted {
            return Err(LicensingError::ContractHalted);
        }
        Ok(())
    }

    /// Shared gate for approve/refuse: circuit breaker, then live owner
    /// check, then existence of a pending request. Returns the owner.
    fn resolve_as_owner(
        &self,
        directory: &impl CapsuleDirectory,
        fingerprint: ContentFingerprint,
        licensee: AccountId,
        caller: AccountId,
    ) -> Result<AccountId, LicensingError> {
        self.require_running()?;
        let owner = directory.owner_of(&fingerprint);
        if owner.is_zero() || caller != owner {
            return Err(LicensingError::NotAuthorized { caller });
        }
        if !self.license_state(&fingerprint, &licensee).is_pending() {
            return Err(LicensingError::NoSuchRequest {
                fingerprint,
                licensee,
            });
        }
        Ok(owner)
    }

    /// Claim the pair's pending escrow for `beneficiary` and flip the
    /// record to `to`. The vault movement is all-or-nothing and the
    /// record's escrow is zeroed in the same operation, so exactly one
    /// resolving operation can ever claim it.
    fn settle(
        &mut self,
        fingerprint: ContentFingerprint,
        licensee: AccountId,
        to: LicenseState,
        beneficiary: AccountId,
    ) -> Result<(), LicensingError> {
        let license = self
            .licenses
            .get_mut(&fingerprint)
            .and_then(|by| by.get_mut(&licensee))
            .filter(|l| l.state.is_pending())
            .ok_or(LicensingError::NoSuchRequest {
                fingerprint,
                licensee,
            })?;

        let escrow = license.escrow;
        self.vault.release_to(beneficiary, escrow)?;
        self.licenses
            .get_mut(&fingerprint)
            .and_then(|by| by.get_mut(&licensee))
            .ok_or(LicensingError::NoSuchRequest {
                fingerprint,
                licensee,
            })?
            .resolve(to);
        Ok(())
    }

    fn emit(&mut self, event: LedgerEvent) -> LedgerEvent {
        self.events.push(event);
        event
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
