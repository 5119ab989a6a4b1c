//! # Vaults Module
//!
//! Time-locked custody for the timelock vault system.
//!
//! ## Components
//!
//! - **Timelock**: the single-deposit, single-withdrawal vault state machine
//! - **Registry**: many vaults behind one clock, ledger and event sink

pub mod registry;
pub mod timelock;

#[cfg(test)]
mod tests;

pub use registry::{VaultHost, VaultId, VaultRegistry};
pub use timelock::{LockedVault, VaultState, Withdrawal};
