//! # Configuration
//!
//! Constants used throughout the timelock vault and the runtime settings
//! resolved from the environment.

use crate::error::{VaultError, VaultResult};
use std::path::PathBuf;

/// Vault operation constants
pub mod vault {
    /// Default lock duration: one year in seconds (365 × 24 × 60 × 60).
    pub const DEFAULT_LOCK_DURATION_SECS: u64 = 31_536_000;

    /// Default deposit used by the demo, in the smallest value unit.
    pub const DEFAULT_DEMO_DEPOSIT: u64 = 1_000_000_000;

    /// Amount minted to the demo creator so it can cover the deposit.
    pub const DEFAULT_FAUCET_AMOUNT: u64 = 10_000_000_000;

    /// First id handed out by a fresh registry.
    pub const FIRST_VAULT_ID: u64 = 1;
}

/// File paths and names
pub mod files {
    /// Persisted host state (registry + ledger)
    pub const STATE_FILE: &str = "vault_state.json";

    /// Withdrawal records, one JSON object per line
    pub const EVENT_LOG: &str = "withdrawals.jsonl";

    /// Directory under the home directory holding both files
    pub const CONFIG_DIR: &str = ".timelock-vault";
}

/// Environment variable names
pub mod env {
    /// State file override
    pub const STATE_FILE: &str = "TIMELOCK_STATE_FILE";

    /// Event log override
    pub const EVENT_LOG: &str = "TIMELOCK_EVENT_LOG";
}

/// Runtime settings for the CLI host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the registry and ledger are persisted
    pub state_file: PathBuf,
    /// Where withdrawal records are appended
    pub event_log: PathBuf,
}

impl Settings {
    /// Resolve settings from the environment, falling back to the
    /// `~/.timelock-vault/` directory.
    pub fn from_env() -> VaultResult<Self> {
        let state_file = match std::env::var_os(env::STATE_FILE) {
            Some(path) => PathBuf::from(path),
            None => Self::default_dir()?.join(files::STATE_FILE),
        };
        let event_log = match std::env::var_os(env::EVENT_LOG) {
            Some(path) => PathBuf::from(path),
            None => Self::default_dir()?.join(files::EVENT_LOG),
        };

        Ok(Self {
            state_file,
            event_log,
        })
    }

    /// Settings rooted in an explicit directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            state_file: dir.join(files::STATE_FILE),
            event_log: dir.join(files::EVENT_LOG),
        }
    }

    fn default_dir() -> VaultResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VaultError::config("unable to determine home directory"))?;
        Ok(home.join(files::CONFIG_DIR))
    }
}
