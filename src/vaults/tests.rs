//! Lifecycle scenarios and property tests for the timelock vault.

use super::*;
use crate::config::vault::{DEFAULT_DEMO_DEPOSIT, DEFAULT_LOCK_DURATION_SECS};
use crate::error::{VaultError, VaultResult};
use crate::identity::Identity;
use crate::services::{Clock, InMemoryLedger, Ledger, ManualClock, RecordingEventSink};
use proptest::prelude::*;

const DEPLOY_TIME: u64 = 1_700_000_000;

type TestHost = VaultHost<ManualClock, InMemoryLedger, RecordingEventSink>;

fn owner() -> Identity {
    Identity::from_name("owner")
}

fn stranger() -> Identity {
    Identity::from_name("stranger")
}

/// One-year lock of the demo deposit, created at `DEPLOY_TIME`
fn deploy_one_year_lock() -> (TestHost, VaultId, u64) {
    let mut ledger = InMemoryLedger::new();
    ledger.mint(&owner(), DEFAULT_DEMO_DEPOSIT).unwrap();
    let mut host = VaultHost::new(
        ManualClock::at(DEPLOY_TIME),
        ledger,
        RecordingEventSink::new(),
    );

    let unlock_time = DEPLOY_TIME + DEFAULT_LOCK_DURATION_SECS;
    let id = host
        .deploy(&owner(), unlock_time, DEFAULT_DEMO_DEPOSIT)
        .unwrap();
    (host, id, unlock_time)
}

#[test]
fn test_withdraw_immediately_is_too_early() {
    let (mut host, id, _) = deploy_one_year_lock();

    let err = host.withdraw(id, &owner()).unwrap_err();
    assert!(matches!(err, VaultError::NotYetUnlocked { .. }));
    assert_eq!(err.to_string(), "you can't withdraw yet");
    assert_eq!(host.vault(id).unwrap().balance(), DEFAULT_DEMO_DEPOSIT);
}

#[test]
fn test_owner_withdraws_at_unlock_time() {
    let (mut host, id, unlock_time) = deploy_one_year_lock();
    host.clock().advance_to(unlock_time);

    let record = host.withdraw(id, &owner()).unwrap();

    assert_eq!(
        record,
        Withdrawal {
            amount: DEFAULT_DEMO_DEPOSIT,
            when: unlock_time
        }
    );
    assert_eq!(host.vault(id).unwrap().balance(), 0);
    assert_eq!(host.ledger().balance_of(&owner()), DEFAULT_DEMO_DEPOSIT);
    assert_eq!(host.events().events(), &[record]);
}

#[test]
fn test_stranger_cannot_withdraw() {
    let (mut host, id, unlock_time) = deploy_one_year_lock();
    host.clock().advance_to(unlock_time);

    let err = host.withdraw(id, &stranger()).unwrap_err();
    assert!(matches!(err, VaultError::Unauthorized));
    assert_eq!(err.to_string(), "you aren't the owner");
    assert_eq!(host.vault(id).unwrap().balance(), DEFAULT_DEMO_DEPOSIT);
    assert!(host.events().events().is_empty());
}

#[test]
fn test_unlock_time_equal_to_now_is_rejected() {
    let mut host = VaultHost::new(
        ManualClock::at(DEPLOY_TIME),
        InMemoryLedger::new(),
        RecordingEventSink::new(),
    );

    let err = host.deploy(&owner(), DEPLOY_TIME, 0).unwrap_err();
    assert!(matches!(err, VaultError::InvalidSchedule { .. }));
    assert_eq!(err.to_string(), "unlock time must be in the future");
    assert!(host.registry().is_empty());
}

#[test]
fn test_second_withdrawal_is_rejected() {
    let (mut host, id, unlock_time) = deploy_one_year_lock();
    host.clock().advance_to(unlock_time);
    host.withdraw(id, &owner()).unwrap();

    host.clock().advance_to(unlock_time + 1);
    let err = host.withdraw(id, &owner()).unwrap_err();
    assert!(matches!(err, VaultError::AlreadyWithdrawn));
    assert_eq!(err.to_string(), "funds have already been withdrawn");
    assert_eq!(host.vault(id).unwrap().balance(), 0);
    assert_eq!(host.ledger().balance_of(&owner()), DEFAULT_DEMO_DEPOSIT);
    assert_eq!(host.events().events().len(), 1);
}

/// Three callers: 0 is the owner, the rest are strangers
fn caller(index: u8) -> Identity {
    match index {
        0 => owner(),
        n => Identity::from_name(&format!("caller-{}", n)),
    }
}

/// Outcome of a single withdrawal attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Paid,
    NotYetUnlocked,
    Unauthorized,
    AlreadyWithdrawn,
    TransferFailed,
}

impl Outcome {
    fn of(result: &VaultResult<Withdrawal>) -> Option<Self> {
        match result {
            Ok(_) => Some(Outcome::Paid),
            Err(VaultError::NotYetUnlocked { .. }) => Some(Outcome::NotYetUnlocked),
            Err(VaultError::Unauthorized) => Some(Outcome::Unauthorized),
            Err(VaultError::AlreadyWithdrawn) => Some(Outcome::AlreadyWithdrawn),
            Err(VaultError::TransferFailed { .. }) => Some(Outcome::TransferFailed),
            Err(_) => None,
        }
    }

    /// What a withdrawal must yield, checking the guards in order
    fn expected(
        now: u64,
        unlock_time: u64,
        is_owner: bool,
        withdrawn: bool,
        owner_rejects: bool,
    ) -> Self {
        if now < unlock_time {
            Outcome::NotYetUnlocked
        } else if !is_owner {
            Outcome::Unauthorized
        } else if withdrawn {
            Outcome::AlreadyWithdrawn
        } else if owner_rejects {
            Outcome::TransferFailed
        } else {
            Outcome::Paid
        }
    }
}

proptest! {
    #[test]
    fn prop_create_requires_future_unlock(now in any::<u64>(), unlock_time in any::<u64>(), deposit in any::<u64>()) {
        let result = LockedVault::create(unlock_time, deposit, owner(), now);
        if now < unlock_time {
            let vault = result.unwrap();
            prop_assert_eq!(vault.balance(), deposit);
            prop_assert_eq!(vault.state(), VaultState::Locked);
        } else {
            let is_invalid_schedule = matches!(result, Err(VaultError::InvalidSchedule { .. }));
            prop_assert!(is_invalid_schedule);
        }
    }

    #[test]
    fn prop_early_withdraw_rejected_for_everyone(
        created in 0u64..1_000_000,
        lock_for in 1u64..1_000_000,
        early_by in 1u64..1_000_000,
        who in 0u8..3,
    ) {
        let unlock_time = created + lock_for;
        let at = unlock_time.saturating_sub(early_by);
        let mut vault = LockedVault::create(unlock_time, 10, owner(), created).unwrap();
        let mut ledger = InMemoryLedger::new();
        let mut events = RecordingEventSink::new();

        let result = vault.withdraw(&caller(who), at, &mut ledger, &mut events);
        let is_not_yet_unlocked = matches!(result, Err(VaultError::NotYetUnlocked { .. }));
        prop_assert!(is_not_yet_unlocked);
        prop_assert_eq!(vault.balance(), 10);
        prop_assert!(events.events().is_empty());
    }

    #[test]
    fn prop_only_owner_may_withdraw(late_by in 0u64..1_000_000, name in "[a-z]{1,12}") {
        prop_assume!(Identity::from_name(&name) != owner());
        let mut vault = LockedVault::create(1_000, 10, owner(), 0).unwrap();
        let mut ledger = InMemoryLedger::new();
        let mut events = RecordingEventSink::new();

        let result = vault.withdraw(&Identity::from_name(&name), 1_000 + late_by, &mut ledger, &mut events);
        let is_unauthorized = matches!(result, Err(VaultError::Unauthorized));
        prop_assert!(is_unauthorized);
        prop_assert_eq!(vault.balance(), 10);
        prop_assert!(!vault.is_withdrawn());
    }

    #[test]
    fn prop_withdrawal_happens_at_most_once(
        deposit in any::<u64>(),
        lock_for in 1u64..500_000,
        calls in prop::collection::vec((0u8..3, 0u64..200_000, any::<bool>()), 1..40),
    ) {
        let created = DEPLOY_TIME;
        let mut host = VaultHost::new(
            ManualClock::at(created),
            InMemoryLedger::new(),
            RecordingEventSink::new(),
        );
        host.ledger_mut().mint(&owner(), deposit).unwrap();
        let id = host.deploy(&owner(), created + lock_for, deposit).unwrap();

        let unlock_time = created + lock_for;
        let mut successes = 0;
        let mut seen_withdrawn = false;
        for (who, step, owner_rejects) in calls {
            host.clock().advance_by(step);
            host.ledger_mut().set_rejecting(&owner(), owner_rejects);
            let before = host.vault(id).unwrap().balance();
            let now = host.clock().now();

            let expected =
                Outcome::expected(now, unlock_time, who == 0, seen_withdrawn, owner_rejects);
            let result = host.withdraw(id, &caller(who));
            prop_assert_eq!(Outcome::of(&result), Some(expected), "result was {:?}", result);

            if let Ok(record) = result {
                successes += 1;
                prop_assert_eq!(record.amount, before);
                prop_assert_eq!(record.amount, deposit);
                prop_assert_eq!(record.when, now);
            } else {
                prop_assert_eq!(host.vault(id).unwrap().balance(), before);
            }

            let vault = host.vault(id).unwrap();
            if seen_withdrawn {
                prop_assert!(vault.is_withdrawn());
            }
            seen_withdrawn = vault.is_withdrawn();
            prop_assert_eq!(seen_withdrawn, successes == 1);
            if seen_withdrawn {
                prop_assert_eq!(vault.balance(), 0);
            }

            let total = host.ledger().total_supply() + host.registry().total_locked();
            prop_assert_eq!(total, u128::from(deposit));
        }

        prop_assert!(successes <= 1);
        prop_assert_eq!(host.events().events().len(), successes);
    }
}
