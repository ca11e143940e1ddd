//! # Error Types for Foundational Parsing and Arithmetic
//!
//! Errors raised while constructing core types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations. Component-level
//! errors (registry write conflicts, licensing preconditions) live with
//! their components, not here.

use thiserror::Error;

/// Errors from constructing or parsing foundational types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An identifier failed hex parsing or had the wrong width.
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        /// Which identifier type was being parsed (e.g., "account id").
        kind: &'static str,
        /// The offending input.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A timestamp string was rejected.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending input.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
}
