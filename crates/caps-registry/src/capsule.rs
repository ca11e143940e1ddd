//! # Capsule Records
//!
//! A capsule is the immutable record stored for a registered content
//! fingerprint: the external storage locator and the owning principal.
//! The fingerprint itself is the map key, not a record field.

use serde::{Deserialize, Serialize};

use caps_core::{AccountId, CapsuleLocator};

/// Immutable registered content record.
///
/// All fields are fixed at registration. There is no update or delete —
/// a capsule lives for the lifetime of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    /// Pointer into external content-addressed storage.
    pub locator: CapsuleLocator,
    /// The principal that registered this capsule.
    pub owner: AccountId,
}

impl Capsule {
    /// The well-defined sentinel read back for unregistered fingerprints:
    /// zero owner, all-zero locator.
    pub fn absent() -> Self {
        Self {
            locator: CapsuleLocator::ABSENT,
            owner: AccountId::ZERO,
        }
    }

    /// Whether this is the absence sentinel.
    pub fn is_absent(&self) -> bool {
        self.owner.is_zero()
    }
}
