//! # Time-Locked Vault
//!
//! A vault holds one deposit until an unlock time and lets its owner take the
//! whole balance out exactly once, no earlier than that time.
//!
//! ## Lifecycle
//!
//! ```text
//!   create(unlock_time > now)        withdraw(owner, now >= unlock_time)
//! ───────────────────────────> Locked ───────────────────────────────────> Withdrawn
//! ```
//!
//! `Withdrawn` is terminal. Every call either commits fully or returns an
//! error and leaves the vault exactly as it was.
//!
//! ## Invariants
//! - a withdrawn vault has a zero balance
//! - the withdrawn flag never goes back to false
//! - unlock time and owner never change after creation
//! - at most one withdrawal succeeds per vault

use crate::error::{VaultError, VaultResult};
use crate::identity::Identity;
use crate::services::{EventSink, Ledger};
use serde::{Deserialize, Serialize};

/// Record of a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Whole balance paid out to the owner
    pub amount: u64,
    /// Timestamp the withdrawal executed at
    pub when: u64,
}

/// Observable vault state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultState {
    /// Holding funds, waiting for the owner
    Locked,
    /// Paid out; permanently inert
    Withdrawn,
}

impl std::fmt::Display for VaultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultState::Locked => write!(f, "locked"),
            VaultState::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// Funds locked for one owner until an unlock time.
///
/// Fields are private: the only way to change a vault is [`LockedVault::withdraw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VaultSnapshot")]
pub struct LockedVault {
    balance: u64,
    unlock_time: u64,
    owner: Identity,
    created_at: u64,
    withdrawn: bool,
}

impl LockedVault {
    /// Create a vault holding `initial_deposit` for `creator` until `unlock_time`.
    ///
    /// Fails with [`VaultError::InvalidSchedule`] unless `now < unlock_time`.
    /// A zero deposit is accepted; such a vault pays out zero.
    pub fn create(
        unlock_time: u64,
        initial_deposit: u64,
        creator: Identity,
        now: u64,
    ) -> VaultResult<Self> {
        if now >= unlock_time {
            log::debug!(
                "Rejecting vault creation: unlock time {} is not after {}",
                unlock_time,
                now
            );
            return Err(VaultError::InvalidSchedule { unlock_time, now });
        }

        Ok(Self {
            balance: initial_deposit,
            unlock_time,
            owner: creator,
            created_at: now,
            withdrawn: false,
        })
    }

    /// Funds currently held
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Earliest timestamp a withdrawal is allowed at
    pub fn unlock_time(&self) -> u64 {
        self.unlock_time
    }

    /// The only identity allowed to withdraw
    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    /// Timestamp the vault was created at
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Whether the one-shot withdrawal already happened
    pub fn is_withdrawn(&self) -> bool {
        self.withdrawn
    }

    /// Current lifecycle state
    pub fn state(&self) -> VaultState {
        if self.withdrawn {
            VaultState::Withdrawn
        } else {
            VaultState::Locked
        }
    }

    /// Whether the unlock time has been reached at `now`
    pub fn is_unlocked(&self, now: u64) -> bool {
        now >= self.unlock_time
    }

    /// Seconds left until unlock, zero once unlocked
    pub fn seconds_until_unlock(&self, now: u64) -> u64 {
        self.unlock_time.saturating_sub(now)
    }

    /// Run the withdrawal guards without changing anything.
    ///
    /// Checked in order, first failure wins: unlock time, owner, one-shot flag.
    /// After a withdrawal only the owner sees `AlreadyWithdrawn`; anyone else
    /// still gets `Unauthorized`.
    pub fn check_withdraw(&self, caller: &Identity, now: u64) -> VaultResult<()> {
        if !self.is_unlocked(now) {
            return Err(VaultError::NotYetUnlocked {
                unlock_time: self.unlock_time,
                now,
            });
        }
        if *caller != self.owner {
            return Err(VaultError::Unauthorized);
        }
        if self.withdrawn {
            return Err(VaultError::AlreadyWithdrawn);
        }
        Ok(())
    }

    /// Pay the whole balance out to the owner.
    ///
    /// The vault is latched as withdrawn before the ledger is asked to move
    /// funds, so anything observing the vault during the transfer already sees
    /// it spent. If the ledger refuses the transfer the latch and balance are
    /// restored and [`VaultError::TransferFailed`] is returned. The event is
    /// recorded only after the transfer went through.
    pub fn withdraw<L, E>(
        &mut self,
        caller: &Identity,
        now: u64,
        ledger: &mut L,
        events: &mut E,
    ) -> VaultResult<Withdrawal>
    where
        L: Ledger + ?Sized,
        E: EventSink + ?Sized,
    {
        if let Err(e) = self.check_withdraw(caller, now) {
            log::debug!("Rejecting withdrawal by {}: {}", caller, e);
            return Err(e);
        }

        let amount = self.balance;
        self.withdrawn = true;
        self.balance = 0;

        if let Err(source) = ledger.transfer(&self.owner, amount) {
            self.balance = amount;
            self.withdrawn = false;
            log::warn!(
                "Payout of {} to {} failed, vault rolled back: {}",
                amount,
                self.owner,
                source
            );
            return Err(VaultError::TransferFailed { source });
        }

        let record = Withdrawal { amount, when: now };
        events.record(&record);
        Ok(record)
    }
}

/// Unchecked wire form of a vault
#[derive(Deserialize)]
struct VaultSnapshot {
    balance: u64,
    unlock_time: u64,
    owner: Identity,
    created_at: u64,
    withdrawn: bool,
}

impl TryFrom<VaultSnapshot> for LockedVault {
    type Error = VaultError;

    fn try_from(snapshot: VaultSnapshot) -> VaultResult<Self> {
        if snapshot.withdrawn && snapshot.balance != 0 {
            return Err(VaultError::corrupt(format!(
                "withdrawn vault still holds {}",
                snapshot.balance
            )));
        }
        if snapshot.created_at >= snapshot.unlock_time {
            return Err(VaultError::corrupt(format!(
                "unlock time {} is not after creation time {}",
                snapshot.unlock_time, snapshot.created_at
            )));
        }

        Ok(Self {
            balance: snapshot.balance,
            unlock_time: snapshot.unlock_time,
            owner: snapshot.owner,
            created_at: snapshot.created_at,
            withdrawn: snapshot.withdrawn,
        })
    }
}
