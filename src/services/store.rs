//! JSON persistence of host state.

use crate::error::VaultResult;
use crate::services::events::EventSink;
use crate::services::ledger::InMemoryLedger;
use crate::utils::fs::write_file_atomic;
use crate::vaults::{VaultRegistry, Withdrawal};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a host needs to resume: the vaults and the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub registry: VaultRegistry,
    pub ledger: InMemoryLedger,
}

/// Loads and saves a [`HostSnapshot`] at a fixed path
#[derive(Debug, Clone)]
pub struct VaultStore {
    path: PathBuf,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot; a missing file is an empty snapshot
    pub fn load(&self) -> VaultResult<HostSnapshot> {
        if !self.path.exists() {
            log::debug!("No state at {}, starting empty", self.path.display());
            return Ok(HostSnapshot::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the stored snapshot atomically
    pub fn save(&self, snapshot: &HostSnapshot) -> VaultResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        write_file_atomic(&self.path, json.as_bytes())?;
        log::debug!("State saved to {}", self.path.display());
        Ok(())
    }

    /// Save the snapshot, then publish the withdrawals it already reflects.
    ///
    /// Nothing reaches `sink` unless the save succeeded.
    pub fn commit<E: EventSink + ?Sized>(
        &self,
        snapshot: &HostSnapshot,
        pending: &[Withdrawal],
        sink: &mut E,
    ) -> VaultResult<()> {
        self.save(snapshot)?;
        for event in pending {
            sink.record(event);
        }
        Ok(())
    }
}
