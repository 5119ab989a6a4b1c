//! # Vault Host
//!
//! Many independent vaults, each with its own balance, wired to one clock,
//! one ledger and one event sink.
//!
//! The host reads the clock exactly once per call and hands the value to the
//! vault. Calls take `&mut self`, so a host serializes every operation on the
//! vaults it owns.

use crate::config::vault as vault_config;
use crate::error::{VaultError, VaultResult};
use crate::identity::Identity;
use crate::services::{Clock, EventSink, Ledger};
use crate::vaults::timelock::{LockedVault, Withdrawal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a vault within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultId(pub u64);

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for VaultId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse().map(VaultId)
    }
}

/// All vaults known to a host, keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRegistry {
    next_id: u64,
    vaults: BTreeMap<VaultId, LockedVault>,
}

impl Default for VaultRegistry {
    fn default() -> Self {
        Self {
            next_id: vault_config::FIRST_VAULT_ID,
            vaults: BTreeMap::new(),
        }
    }
}

impl VaultRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vault under the next free id
    pub fn insert(&mut self, vault: LockedVault) -> VaultId {
        let after_last = self
            .vaults
            .keys()
            .next_back()
            .map_or(vault_config::FIRST_VAULT_ID, |id| id.0 + 1);
        let id = VaultId(self.next_id.max(after_last));
        self.next_id = id.0 + 1;
        self.vaults.insert(id, vault);
        id
    }

    pub fn get(&self, id: VaultId) -> Option<&LockedVault> {
        self.vaults.get(&id)
    }

    pub fn get_mut(&mut self, id: VaultId) -> Option<&mut LockedVault> {
        self.vaults.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VaultId, &LockedVault)> {
        self.vaults.iter().map(|(id, vault)| (*id, vault))
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// Funds held across all vaults
    pub fn total_locked(&self) -> u128 {
        self.vaults.values().map(|v| u128::from(v.balance())).sum()
    }
}

/// Runs vault operations against a clock, a ledger and an event sink
#[derive(Debug)]
pub struct VaultHost<C, L, E> {
    clock: C,
    ledger: L,
    events: E,
    registry: VaultRegistry,
}

impl<C: Clock, L: Ledger, E: EventSink> VaultHost<C, L, E> {
    /// Host with no vaults
    pub fn new(clock: C, ledger: L, events: E) -> Self {
        Self::with_registry(clock, ledger, events, VaultRegistry::new())
    }

    /// Host resuming an existing registry
    pub fn with_registry(clock: C, ledger: L, events: E, registry: VaultRegistry) -> Self {
        Self {
            clock,
            ledger,
            events,
            registry,
        }
    }

    /// Lock `deposit` from `creator` until `unlock_time`.
    ///
    /// The schedule is validated before the ledger is touched; if the deposit
    /// cannot be collected no vault is registered.
    pub fn deploy(
        &mut self,
        creator: &Identity,
        unlock_time: u64,
        deposit: u64,
    ) -> VaultResult<VaultId> {
        let now = self.clock.now();
        let vault = LockedVault::create(unlock_time, deposit, *creator, now)?;

        self.ledger.collect(creator, deposit).map_err(|source| {
            log::warn!("Deposit of {} from {} refused: {}", deposit, creator, source);
            VaultError::DepositFailed { source }
        })?;

        let id = self.registry.insert(vault);
        log::info!(
            "Vault {} created: owner={} deposit={} unlock_time={}",
            id,
            creator,
            deposit,
            unlock_time
        );
        Ok(id)
    }

    /// Withdraw the whole balance of vault `id` on behalf of `caller`
    pub fn withdraw(&mut self, id: VaultId, caller: &Identity) -> VaultResult<Withdrawal> {
        let now = self.clock.now();
        let vault = self
            .registry
            .get_mut(id)
            .ok_or(VaultError::VaultNotFound { id })?;

        let record = vault.withdraw(caller, now, &mut self.ledger, &mut self.events)?;
        log::info!(
            "Vault {} withdrawn: amount={} when={}",
            id,
            record.amount,
            record.when
        );
        Ok(record)
    }

    pub fn vault(&self, id: VaultId) -> Option<&LockedVault> {
        self.registry.get(id)
    }

    pub fn vaults(&self) -> impl Iterator<Item = (VaultId, &LockedVault)> {
        self.registry.iter()
    }

    pub fn registry(&self) -> &VaultRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access, e.g. for funding accounts
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    /// Take the host apart: clock, ledger, events, registry
    pub fn into_parts(self) -> (C, L, E, VaultRegistry) {
        (self.clock, self.ledger, self.events, self.registry)
    }
}
