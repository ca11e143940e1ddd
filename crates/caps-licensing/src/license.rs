//! # License Records
//!
//! A license is the per-(fingerprint, licensee) record of one request and
//! its resolution. While pending it owns the escrowed value; resolution
//! zeroes the escrow and flips the state in the same operation, so a
//! resolved record can never release value twice.

use serde::{Deserialize, Serialize};

use caps_core::{Amount, Timestamp};

/// The lifecycle state of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseState {
    /// No license on record for the pair.
    None,
    /// Requested and awaiting the owner's decision; escrow held.
    Requested,
    /// Approved by the owner; escrow released to the owner (terminal).
    Approved,
    /// Refused by the owner; escrow returned to the licensee (terminal).
    Refused,
    /// Cancelled by the licensee; escrow returned to the licensee (terminal).
    Cancelled,
}

impl LicenseState {
    /// Whether a request is pending resolution.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Requested)
    }

    /// Whether this state is terminal for the current record.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Refused | Self::Cancelled)
    }
}

impl std::fmt::Display for LicenseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Requested => "REQUESTED",
            Self::Approved => "APPROVED",
            Self::Refused => "REFUSED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// One license record: state, held escrow, and timing bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Current lifecycle state.
    pub state: LicenseState,
    /// Value held for this license while the state is `Requested`;
    /// zeroed on resolution.
    pub escrow: Amount,
    /// When the request was made.
    pub requested_at: Timestamp,
    /// When the request was resolved, if it has been.
    pub resolved_at: Option<Timestamp>,
}

impl License {
    /// Create a fresh pending license holding `escrow`.
    pub fn requested(escrow: Amount) -> Self {
        Self {
            state: LicenseState::Requested,
            escrow,
            requested_at: Timestamp::now(),
            resolved_at: None,
        }
    }

    /// Flip to a terminal state, zeroing the escrow bookkeeping.
    ///
    /// The caller moves the value through the vault in the same operation;
    /// after this the record can never release value again.
    pub fn resolve(&mut self, to: LicenseState) {
        debug_assert!(to.is_terminal());
        self.state = to;
        self.escrow = Amount::ZERO;
        self.resolved_at = Some(Timestamp::now());
    }
}
