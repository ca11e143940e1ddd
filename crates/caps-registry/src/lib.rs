//! # caps-registry — Content-Addressed Ownership Registry
//!
//! An append-only mapping from content fingerprint to an immutable capsule
//! record and its owner. The registry is intentionally minimal and
//! permissionless at write time: registration is open to any principal,
//! first-write-wins, and ownership itself is the access-control primitive
//! consumed downstream by the licensing ledger.
//!
//! ## Guarantees
//!
//! - At most one capsule per fingerprint; records are immutable and never
//!   destroyed (no update or delete exists).
//! - Reads never fail: unknown fingerprints return the absent sentinel
//!   (`Capsule::absent()`, zero owner).
//! - Registration order is preserved and exposed through the
//!   [`CapsuleDirectory`] trait for ordered enumeration by collaborators.

pub mod capsule;
pub mod directory;
pub mod registry;

pub use capsule::Capsule;
pub use directory::CapsuleDirectory;
pub use registry::{CapsuleRegistry, RegistryError, RegistryEvent};
