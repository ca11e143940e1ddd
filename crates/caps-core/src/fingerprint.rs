//! # Content Fingerprints
//!
//! `ContentFingerprint` is the 32-byte hash that uniquely identifies a
//! piece of content and serves as the registry's primary key. The stack
//! never stores content itself — only fingerprints and storage locators.
//!
//! ## Invariant
//!
//! `ContentFingerprint::ZERO` is reserved as the absence sentinel and can
//! never belong to a real registration; the registry rejects it at write
//! time.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::hexstr;

/// Width of a content fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// Fixed-width content hash used as the registry key.
///
/// Serializes as a `0x`-prefixed lowercase hex string so it can be used as
/// a JSON map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentFingerprint([u8; FINGERPRINT_LEN]);

impl ContentFingerprint {
    /// The all-zero sentinel; never a real registration.
    pub const ZERO: Self = Self([0u8; FINGERPRINT_LEN]);

    /// Wrap raw fingerprint bytes.
    pub fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Compute the fingerprint of raw content bytes via SHA-256.
    pub fn from_content(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        let mut bytes = [0u8; FINGERPRINT_LEN];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Parse from a hex string (optional `0x` prefix, 64 hex chars).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        hexstr::decode_fixed(s)
            .map(Self)
            .map_err(|reason| CoreError::InvalidIdentifier {
                kind: "content fingerprint",
                value: s.to_string(),
                reason,
            })
    }

    /// Whether this is the absence sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Access the raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Render as a `0x`-prefixed lowercase hex string.
    pub fn to_hex(&self) -> String {
        hexstr::encode(&self.0)
    }
}

impl std::fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentFingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_content_deterministic() {
        let a = ContentFingerprint::from_content(b"capsule payload");
        let b = ContentFingerprint::from_content(b"capsule payload");
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn test_from_content_known_vector() {
        // SHA256 of the empty input, verified against sha256sum /dev/null.
        let fp = ContentFingerprint::from_content(b"");
        assert_eq!(
            fp.to_hex(),
            "0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_different_content_different_fingerprints() {
        let a = ContentFingerprint::from_content(b"a");
        let b = ContentFingerprint::from_content(b"b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_round_trip() {
        let fp = ContentFingerprint::from_content(b"x");
        assert_eq!(ContentFingerprint::from_hex(&fp.to_hex()).unwrap(), fp);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let fp = ContentFingerprint::from_bytes([7u8; 32]);
        let json = serde_json::to_string(&fp).unwrap();
        let parsed: ContentFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, fp);
    }

    proptest! {
        #[test]
        fn prop_hex_round_trip(bytes in proptest::array::uniform32(any::<u8>())) {
            let fp = ContentFingerprint::from_bytes(bytes);
            prop_assert_eq!(ContentFingerprint::from_hex(&fp.to_hex()).unwrap(), fp);
        }
    }
}
