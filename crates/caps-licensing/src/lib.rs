//! # caps-licensing — License State Machine with Escrow
//!
//! The licensing ledger lets third parties request, and capsule owners
//! approve or refuse, paid access to registered content. Payment is held
//! in escrow until resolution. An administrator-controlled circuit
//! breaker halts every value-moving operation while leaving reads open.
//!
//! ## State Machine (per fingerprint/licensee pair)
//!
//! ```text
//! None ──request──▶ Requested ──approve──▶ Approved   (escrow → owner)
//!                       │
//!                       ├──refuse───▶ Refused          (escrow → licensee)
//!                       │
//!                       └──cancel───▶ Cancelled        (escrow → licensee,
//!                                                       licensee only)
//! ```
//!
//! All three resolved states are absorbing: exactly one resolving
//! operation ever claims a pending license's escrow.
//!
//! ## Registry Relationship
//!
//! The ledger never writes to the registry. Ownership is read live through
//! the [`CapsuleDirectory`](caps_registry::CapsuleDirectory) seam on every
//! authorization decision and listing query.

pub mod ledger;
pub mod license;
pub mod vault;

pub use ledger::{LedgerEvent, LicensingError, LicensingLedger, Listing};
pub use license::{License, LicenseState};
pub use vault::EscrowVault;
