//! # Storage Locators
//!
//! A capsule does not carry its content; it carries a pointer into an
//! external content-addressed store. `CapsuleLocator` is that pointer in
//! self-describing multihash form: the digest bytes plus the hash function
//! code and digest length that produced them.
//!
//! The registry stores locators verbatim — it never dereferences them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::hexstr;

/// Width of a locator digest in bytes.
pub const LOCATOR_DIGEST_LEN: usize = 32;

/// Multihash function code for sha2-256, the common case for
/// content-addressed network digests.
pub const MULTIHASH_SHA2_256: u8 = 0x12;

/// Raw digest bytes of a storage locator.
///
/// Serializes as a `0x`-prefixed lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocatorDigest([u8; LOCATOR_DIGEST_LEN]);

impl LocatorDigest {
    /// The all-zero sentinel digest.
    pub const ZERO: Self = Self([0u8; LOCATOR_DIGEST_LEN]);

    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; LOCATOR_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a hex string (optional `0x` prefix, 64 hex chars).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        hexstr::decode_fixed(s)
            .map(Self)
            .map_err(|reason| CoreError::InvalidIdentifier {
                kind: "locator digest",
                value: s.to_string(),
                reason,
            })
    }

    /// Whether this is the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; LOCATOR_DIGEST_LEN] {
        &self.0
    }

    /// Render as a `0x`-prefixed lowercase hex string.
    pub fn to_hex(&self) -> String {
        hexstr::encode(&self.0)
    }
}

impl std::fmt::Display for LocatorDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for LocatorDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for LocatorDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Self-describing pointer into external content-addressed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapsuleLocator {
    /// The raw digest addressing the content.
    pub digest: LocatorDigest,
    /// Multihash function code that produced the digest (e.g., 0x12).
    pub hash_function: u8,
    /// Byte length of the digest.
    pub hash_size: u8,
}

impl CapsuleLocator {
    /// The all-zero sentinel read back for unregistered fingerprints.
    pub const ABSENT: Self = Self {
        digest: LocatorDigest::ZERO,
        hash_function: 0,
        hash_size: 0,
    };

    /// Build a locator with explicit multihash parameters.
    pub fn new(digest: LocatorDigest, hash_function: u8, hash_size: u8) -> Self {
        Self {
            digest,
            hash_function,
            hash_size,
        }
    }

    /// Build a sha2-256 locator (function 0x12, size 32).
    pub fn sha2_256(digest: LocatorDigest) -> Self {
        Self::new(digest, MULTIHASH_SHA2_256, LOCATOR_DIGEST_LEN as u8)
    }

    /// Whether this is the absence sentinel.
    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}
