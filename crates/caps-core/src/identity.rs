//! # Principal Identities
//!
//! `AccountId` is the opaque address of an already-authenticated principal.
//! The stack performs no key management — identities arrive authenticated
//! from the caller's environment and are compared for equality only.
//!
//! ## Absence Sentinel
//!
//! `AccountId::ZERO` denotes "no principal". Registry reads for unknown
//! fingerprints return it as the owner; it is never a real caller.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::hexstr;

/// Width of a principal address in bytes.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Opaque fixed-width address of a principal.
///
/// Serializes as a `0x`-prefixed lowercase hex string so it can be used as
/// a JSON map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The distinguished absent identity.
    pub const ZERO: Self = Self([0u8; ACCOUNT_ID_LEN]);

    /// Wrap raw address bytes.
    pub fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string (optional `0x` prefix, 40 hex chars).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        hexstr::decode_fixed(s)
            .map(Self)
            .map_err(|reason| CoreError::InvalidIdentifier {
                kind: "account id",
                value: s.to_string(),
                reason,
            })
    }

    /// Whether this is the absent identity.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Access the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Render as a `0x`-prefixed lowercase hex string.
    pub fn to_hex(&self) -> String {
        hexstr::encode(&self.0)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
