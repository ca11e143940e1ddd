//! Lowercase hex encoding for fixed-width identifiers.
//!
//! All byte-array identifiers in the stack render as `0x`-prefixed
//! lowercase hex and parse from the same form (the prefix is optional on
//! input). Kept crate-private; the public surface is the newtypes.

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub(crate) fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Decode a hex string (optional `0x` prefix) into exactly `N` bytes.
///
/// Returns a human-readable reason on failure; callers wrap it into their
/// own error type.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != N * 2 {
        return Err(format!(
            "expected {} hex chars, got {}",
            N * 2,
            digits.len()
        ));
    }
    let mut out = [0u8; N];
    for (i, chunk) in digits.as_bytes().chunks_exact(2).enumerate() {
        let hi = hex_val(chunk[0]).ok_or_else(|| non_hex(chunk[0]))?;
        let lo = hex_val(chunk[1]).ok_or_else(|| non_hex(chunk[1]))?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn non_hex(c: u8) -> String {
    format!("invalid hex character {:?}", c as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_prefixes_and_lowercases() {
        assert_eq!(encode(&[0xAB, 0x00, 0x7F]), "0xab007f");
    }

    #[test]
    fn test_decode_accepts_optional_prefix() {
        let with: [u8; 2] = decode_fixed("0xbeef").unwrap();
        let without: [u8; 2] = decode_fixed("beef").unwrap();
        assert_eq!(with, [0xBE, 0xEF]);
        assert_eq!(with, without);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert!(decode_fixed::<2>("0xbe").is_err());
        assert!(decode_fixed::<2>("0xbeeff0").is_err());
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(decode_fixed::<2>("0xbeqq").is_err());
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        let v: [u8; 2] = decode_fixed("0xBEEF").unwrap();
        assert_eq!(v, [0xBE, 0xEF]);
    }
}
