//! # caps-core — Foundational Types for the Capsule Stack
//!
//! This crate is the bedrock of the capsule stack. It defines the
//! type-system primitives shared by the registry and the licensing ledger;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`,
//!    `ContentFingerprint`, `LocatorDigest`, `Amount` — all newtypes with
//!    validated constructors. No bare byte arrays or integers for
//!    identifiers and value.
//!
//! 2. **Explicit absence sentinels.** `AccountId::ZERO` and
//!    `ContentFingerprint::ZERO` denote "no principal" and "no content".
//!    Registry reads for unknown fingerprints return sentinels, never
//!    errors.
//!
//! 3. **Checked value arithmetic.** `Amount` exposes only checked
//!    operations; escrow accounting cannot silently wrap.
//!
//! 4. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix and
//!    seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `caps-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod amount;
pub mod error;
pub mod fingerprint;
mod hexstr;
pub mod identity;
pub mod locator;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use error::CoreError;
pub use fingerprint::ContentFingerprint;
pub use identity::AccountId;
pub use locator::{CapsuleLocator, LocatorDigest, MULTIHASH_SHA2_256};
pub use temporal::Timestamp;
