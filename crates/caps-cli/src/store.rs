//! State file persistence.
//!
//! The CLI keeps one registry and one ledger together in a JSON state
//! file; every subcommand loads it, applies one operation, and writes it
//! back whole. The sequential file rewrite mirrors the ledger's
//! one-operation-at-a-time discipline.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use caps_core::AccountId;
use caps_licensing::LicensingLedger;
use caps_registry::CapsuleRegistry;

/// On-disk bundle of the registry and the licensing ledger.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateFile {
    pub registry: CapsuleRegistry,
    pub ledger: LicensingLedger,
}

impl StateFile {
    /// Fresh state administered by `admin`.
    pub fn new(admin: AccountId) -> Self {
        Self {
            registry: CapsuleRegistry::new(),
            ledger: LicensingLedger::new(admin),
        }
    }

    /// Load state from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading state file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parsing state file {}", path.display()))
    }

    /// Write state to `path`, pretty-printed for inspectability.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(self).context("serializing state")?;
        std::fs::write(path, data)
            .with_context(|| format!("writing state file {}", path.display()))
    }
}
