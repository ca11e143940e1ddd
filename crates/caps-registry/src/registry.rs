//! # Capsule Registry
//!
//! The append-only ownership table. One registration per fingerprint,
//! first-write-wins, no authorization beyond "caller becomes owner".
//! Every successful registration is recorded in an internal audit log in
//! operation order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use caps_core::{AccountId, CapsuleLocator, ContentFingerprint};

use crate::capsule::Capsule;
use crate::directory::CapsuleDirectory;

// ─── Events ──────────────────────────────────────────────────────────

/// Audit notifications emitted by the registry, in operation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A capsule was registered.
    CapsuleRegistered {
        /// The newly registered fingerprint.
        fingerprint: ContentFingerprint,
        /// The registering principal, now the owner.
        owner: AccountId,
    },
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by registry writes. Reads never fail.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A capsule already exists for the fingerprint; records are immutable.
    #[error("capsule already registered for fingerprint {fingerprint}")]
    DuplicateFingerprint {
        /// The conflicting fingerprint.
        fingerprint: ContentFingerprint,
    },

    /// The zero fingerprint is the absence sentinel and can never be a
    /// real registration.
    #[error("the zero fingerprint cannot be registered")]
    ZeroFingerprint,
}

// ─── The Registry ────────────────────────────────────────────────────

/// Append-only mapping from content fingerprint to capsule record.
///
/// Insertion order is tracked separately from the lookup table so that
/// collaborators can enumerate registrations in the order they happened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapsuleRegistry {
    capsules: HashMap<ContentFingerprint, Capsule>,
    order: Vec<ContentFingerprint>,
    events: Vec<RegistryEvent>,
}

impl CapsuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capsule for `fingerprint`, owned by `caller`.
    ///
    /// First-write-wins: a second registration for the same fingerprint
    /// fails with [`RegistryError::DuplicateFingerprint`] regardless of
    /// caller. The zero fingerprint is rejected outright. On success the
    /// emitted [`RegistryEvent::CapsuleRegistered`] is both appended to
    /// the audit log and returned.
    pub fn register_capsule(
        &mut self,
        fingerprint: ContentFingerprint,
        locator: CapsuleLocator,
        caller: AccountId,
    ) -> Result<RegistryEvent, RegistryError> {
        if fingerprint.is_zero() {
            return Err(RegistryError::ZeroFingerprint);
        }
        if self.capsules.contains_key(&fingerprint) {
            return Err(RegistryError::DuplicateFingerprint { fingerprint });
        }

        self.capsules.insert(
            fingerprint,
            Capsule {
                locator,
                owner: caller,
            },
        );
        self.order.push(fingerprint);

        let event = RegistryEvent::CapsuleRegistered {
            fingerprint,
            owner: caller,
        };
        self.events.push(event);
        Ok(event)
    }

    /// Owner of the capsule for `fingerprint`; `AccountId::ZERO` if none.
    pub fn owner_of(&self, fingerprint: &ContentFingerprint) -> AccountId {
        self.capsules
            .get(fingerprint)
            .map(|c| c.owner)
            .unwrap_or(AccountId::ZERO)
    }

    /// Full capsule record for `fingerprint`; the absent sentinel if none.
    pub fn capsule(&self, fingerprint: &ContentFingerprint) -> Capsule {
        self.capsules
            .get(fingerprint)
            .copied()
            .unwrap_or_else(Capsule::absent)
    }

    /// Every registered fingerprint, in registration order.
    pub fn fingerprints(&self) -> &[ContentFingerprint] {
        &self.order
    }

    /// Number of registered capsules.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no capsule has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The audit log of emitted events, in operation order.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}

impl CapsuleDirectory for CapsuleRegistry {
    fn owner_of(&self, fingerprint: &ContentFingerprint) -> AccountId {
        CapsuleRegistry::owner_of(self, fingerprint)
    }

    fn capsule(&self, fingerprint: &ContentFingerprint) -> Capsule {
        CapsuleRegistry::capsule(self, fingerprint)
    }

    fn fingerprints(&self) -> &[ContentFingerprint] {
        CapsuleRegistry::fingerprints(self)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use caps_core::LocatorDigest;

    fn fp(byte: u8) -> ContentFingerprint {
        ContentFingerprint::from_bytes([byte; 32])
    }

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 20])
    }

    fn locator(byte: u8) -> CapsuleLocator {
        CapsuleLocator::new(LocatorDigest::from_bytes([byte; 32]), 18, 32)
    }

    #[test]
    fn test_register_emits_event() {
        let mut registry = CapsuleRegistry::new();
        let event = registry
            .register_capsule(fp(1), locator(1), account(0xA))
            .unwrap();
        assert_eq!(
            event,
            RegistryEvent::CapsuleRegistered {
                fingerprint: fp(1),
                owner: account(0xA),
            }
        );
        assert_eq!(registry.events(), &[event]);
    }

    #[test]
    fn test_duplicate_fingerprint_rejected_for_any_caller() {
        let mut registry = CapsuleRegistry::new();
        registry
            .register_capsule(fp(1), locator(1), account(0xA))
            .unwrap();

        // Same caller.
        let err = registry
            .register_capsule(fp(1), locator(1), account(0xA))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateFingerprint { .. }));

        // Different caller; first write still wins.
        let err = registry
            .register_capsule(fp(1), locator(2), account(0xB))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateFingerprint { .. }));
        assert_eq!(registry.owner_of(&fp(1)), account(0xA));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_zero_fingerprint_rejected() {
        let mut registry = CapsuleRegistry::new();
        let err = registry
            .register_capsule(ContentFingerprint::ZERO, locator(1), account(0xA))
            .unwrap_err();
        assert!(matches!(err, RegistryError::ZeroFingerprint));
        assert!(registry.is_empty());
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_owner_of_unknown_is_zero() {
        let registry = CapsuleRegistry::new();
        assert_eq!(registry.owner_of(&fp(9)), AccountId::ZERO);
    }

    #[test]
    fn test_capsule_readback_is_field_exact() {
        let mut registry = CapsuleRegistry::new();
        registry
            .register_capsule(fp(1), locator(7), account(0xA))
            .unwrap();
        let capsule = registry.capsule(&fp(1));
        assert_eq!(capsule.locator.digest, LocatorDigest::from_bytes([7u8; 32]));
        assert_eq!(capsule.locator.hash_function, 18);
        assert_eq!(capsule.locator.hash_size, 32);
        assert_eq!(capsule.owner, account(0xA));
    }

    #[test]
    fn test_capsule_unknown_is_absent_sentinel() {
        let registry = CapsuleRegistry::new();
        let capsule = registry.capsule(&fp(9));
        assert!(capsule.is_absent());
        assert!(capsule.locator.digest.is_zero());
        assert_eq!(capsule.locator.hash_function, 0);
        assert_eq!(capsule.locator.hash_size, 0);
    }

    #[test]
    fn test_fingerprints_preserve_registration_order() {
        let mut registry = CapsuleRegistry::new();
        for byte in [5u8, 3, 9, 1] {
            registry
                .register_capsule(fp(byte), locator(byte), account(0xA))
                .unwrap();
        }
        assert_eq!(registry.fingerprints(), &[fp(5), fp(3), fp(9), fp(1)]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut registry = CapsuleRegistry::new();
        registry
            .register_capsule(fp(1), locator(1), account(0xA))
            .unwrap();
        let json = serde_json::to_string(&registry).unwrap();
        let parsed: CapsuleRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.owner_of(&fp(1)), account(0xA));
        assert_eq!(parsed.fingerprints(), registry.fingerprints());
        assert_eq!(parsed.events(), registry.events());
    }
}
