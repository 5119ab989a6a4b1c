//! # Value Ledger
//!
//! Tracks account balances outside the vaults. A vault takes its deposit from
//! the ledger when it is created and pays the owner out through the ledger
//! when it is withdrawn.
//!
//! Both mutating operations are all-or-nothing: on error no balance changes.

use crate::error::{LedgerError, LedgerResult};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Moves value between accounts and vault custody
pub trait Ledger {
    /// Current balance of `account`
    fn balance_of(&self, account: &Identity) -> u64;

    /// Take an inbound deposit of `amount` from `from` into vault custody
    fn collect(&mut self, from: &Identity, amount: u64) -> LedgerResult<()>;

    /// Pay `amount` out of vault custody to `to`
    fn transfer(&mut self, to: &Identity, amount: u64) -> LedgerResult<()>;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn balance_of(&self, account: &Identity) -> u64 {
        (**self).balance_of(account)
    }

    fn collect(&mut self, from: &Identity, amount: u64) -> LedgerResult<()> {
        (**self).collect(from, amount)
    }

    fn transfer(&mut self, to: &Identity, amount: u64) -> LedgerResult<()> {
        (**self).transfer(to, amount)
    }
}

/// In-memory ledger with a faucet and per-account transfer rejection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: BTreeMap<Identity, u64>,
    #[serde(default)]
    rejecting: BTreeSet<Identity>,
}

impl InMemoryLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air
    pub fn mint(&mut self, account: &Identity, amount: u64) -> LedgerResult<()> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                recipient: account.to_string(),
            })?;
        Ok(())
    }

    /// Mark `account` as refusing (or accepting again) inbound transfers
    pub fn set_rejecting(&mut self, account: &Identity, rejecting: bool) {
        if rejecting {
            self.rejecting.insert(*account);
        } else {
            self.rejecting.remove(account);
        }
    }

    /// Whether `account` refuses inbound transfers
    pub fn is_rejecting(&self, account: &Identity) -> bool {
        self.rejecting.contains(account)
    }

    /// Sum of all account balances
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|&b| u128::from(b)).sum()
    }

    /// Accounts with their balances, in identity order
    pub fn accounts(&self) -> impl Iterator<Item = (&Identity, u64)> {
        self.balances.iter().map(|(id, &balance)| (id, balance))
    }
}

impl Ledger for InMemoryLedger {
    fn balance_of(&self, account: &Identity) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn collect(&mut self, from: &Identity, amount: u64) -> LedgerResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        Ok(())
    }

    fn transfer(&mut self, to: &Identity, amount: u64) -> LedgerResult<()> {
        if self.is_rejecting(to) {
            return Err(LedgerError::RecipientRejected {
                recipient: to.to_string(),
            });
        }
        self.mint(to, amount)
    }
}
