//! # Capsule Directory — Read-Only Query Seam
//!
//! The licensing ledger never writes to the registry; it only needs three
//! query capabilities: owner lookup, full-record lookup, and ordered
//! enumeration of every registered fingerprint. `CapsuleDirectory` names
//! that seam explicitly so the ledger can be exercised against the real
//! registry or a test double.

use caps_core::{AccountId, ContentFingerprint};

use crate::capsule::Capsule;

/// Read-only view of a capsule registry.
///
/// All queries are total: unknown fingerprints yield sentinels, never
/// errors. Implementations must preserve registration order in
/// [`fingerprints`](CapsuleDirectory::fingerprints).
pub trait CapsuleDirectory {
    /// Owner of the capsule for `fingerprint`; `AccountId::ZERO` if none.
    fn owner_of(&self, fingerprint: &ContentFingerprint) -> AccountId;

    /// Full capsule record for `fingerprint`; `Capsule::absent()` if none.
    fn capsule(&self, fingerprint: &ContentFingerprint) -> Capsule;

    /// Every registered fingerprint, in registration order.
    fn fingerprints(&self) -> &[ContentFingerprint];

    /// Number of registered capsules.
    fn capsule_count(&self) -> usize {
        self.fingerprints().len()
    }
}
