//! # Timelock Vault Library
//!
//! Time-locked value custody: an owner deposits funds when a vault is
//! created, picks a future unlock time, and may withdraw the entire balance
//! exactly once, no earlier than that time.
//!
//! The vault itself is a small state machine. Time, balances, caller
//! identities and withdrawal notifications come from the host environment
//! through the traits in [`services`], so the same vault runs against the
//! system clock in the CLI and against a manual clock in tests.

pub mod config;
pub mod error;
pub mod identity;
pub mod services;
pub mod utils;
pub mod vaults;

// Re-export commonly used types
pub use error::{LedgerError, VaultError, VaultResult};
pub use identity::Identity;
pub use services::{Clock, EventSink, InMemoryLedger, Ledger, ManualClock, SystemClock};
pub use vaults::{LockedVault, VaultHost, VaultId, VaultState, Withdrawal};
