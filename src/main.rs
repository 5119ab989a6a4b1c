//! # Timelock Vault CLI
//!
//! Lock funds until a future time, then withdraw them once.
//!
//! State (vaults and account balances) lives in a JSON file, by default
//! `~/.timelock-vault/vault_state.json`. Withdrawal records are appended to
//! `withdrawals.jsonl` next to it.
//!
//! ```bash
//! # Give alice something to lock
//! timelock-vault fund --account alice --amount 1000000000
//!
//! # Lock it for a year
//! timelock-vault create --owner alice --amount 1000000000
//!
//! # Try to take it out (fails until the unlock time)
//! timelock-vault withdraw --vault 1 --caller alice
//!
//! # Pretend it is a year later
//! timelock-vault --at 1900000000 withdraw --vault 1 --caller alice
//!
//! # Walk through the full lifecycle with a simulated clock
//! timelock-vault demo
//! ```
//!
//! Accounts can be given as `0x` hex identities or as plain names, which are
//! hashed into an identity.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timelock_vault::config::{vault as vault_config, Settings};
use timelock_vault::services::{
    Clock, HostSnapshot, InMemoryLedger, JsonLinesEventSink, Ledger, LogEventSink, ManualClock,
    RecordingEventSink, SystemClock, VaultStore,
};
use timelock_vault::utils::{amount::format_units, time};
use timelock_vault::{Identity, LockedVault, VaultHost, VaultId};

#[derive(Parser)]
#[command(name = "timelock-vault")]
#[command(about = "Lock funds until a future time, then withdraw them once")]
struct Cli {
    /// State file to use instead of the configured one
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    /// Pin the clock to this unix timestamp instead of system time
    #[arg(long, global = true)]
    at: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Credit an account from the faucet
    Fund {
        /// Account name or 0x identity
        #[arg(long)]
        account: String,
        /// Amount in the smallest unit
        #[arg(long, default_value_t = vault_config::DEFAULT_FAUCET_AMOUNT)]
        amount: u64,
    },
    /// Lock funds from an account until a future time
    Create {
        /// Owner and depositor (name or 0x identity)
        #[arg(long)]
        owner: String,
        /// Deposit in the smallest unit
        #[arg(long)]
        amount: u64,
        /// Absolute unlock time (unix seconds)
        #[arg(long, conflicts_with = "unlock_in")]
        unlock_at: Option<u64>,
        /// Unlock this many seconds from now
        #[arg(long, default_value_t = vault_config::DEFAULT_LOCK_DURATION_SECS)]
        unlock_in: u64,
    },
    /// Withdraw the whole balance of a vault
    Withdraw {
        /// Vault id
        #[arg(long)]
        vault: VaultId,
        /// Caller (name or 0x identity)
        #[arg(long)]
        caller: String,
    },
    /// Show vaults
    Status {
        /// Only this vault
        #[arg(long)]
        vault: Option<VaultId>,
    },
    /// Show an account balance
    Balance {
        /// Account name or 0x identity
        #[arg(long)]
        account: String,
    },
    /// Run the vault lifecycle against a simulated clock
    Demo,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Commands::Demo = cli.command {
        return run_demo();
    }

    let mut settings = Settings::from_env().context("Failed to resolve settings")?;
    if let Some(path) = cli.state {
        settings.state_file = path;
    }

    let store = VaultStore::new(&settings.state_file);
    let snapshot = store
        .load()
        .with_context(|| format!("Failed to load state from {}", store.path().display()))?;

    let clock: Box<dyn Clock> = match cli.at {
        Some(timestamp) => Box::new(ManualClock::at(timestamp)),
        None => Box::new(SystemClock),
    };
    // Withdrawal records are held back until the state that reflects them is saved
    let mut host = VaultHost::with_registry(
        clock.as_ref(),
        snapshot.ledger,
        RecordingEventSink::new(),
        snapshot.registry,
    );

    let pending: Option<Vec<String>> = match cli.command {
        Commands::Fund { account, amount } => {
            let account = Identity::resolve(&account)?;
            host.ledger_mut().mint(&account, amount)?;
            Some(vec![format!(
                "Funded {} with {}; balance is now {}",
                account,
                format_units(amount),
                format_units(host.ledger().balance_of(&account))
            )])
        }
        Commands::Create {
            owner,
            amount,
            unlock_at,
            unlock_in,
        } => {
            let owner = Identity::resolve(&owner)?;
            let unlock_time = match unlock_at {
                Some(timestamp) => timestamp,
                None => host.clock().now().saturating_add(unlock_in),
            };
            let id = host.deploy(&owner, unlock_time, amount)?;
            Some(vec![
                format!("Vault {} created", id),
                format!("Owner:   {}", owner),
                format!("Balance: {}", format_units(amount)),
                format!("Unlocks: {}", time::format_timestamp(unlock_time)),
            ])
        }
        Commands::Withdraw { vault, caller } => {
            let caller = Identity::resolve(&caller)?;
            let record = host.withdraw(vault, &caller)?;
            Some(vec![format!(
                "Withdrew {} from vault {} at {}",
                format_units(record.amount),
                vault,
                time::format_timestamp(record.when)
            )])
        }
        Commands::Status { vault } => {
            let now = host.clock().now();
            match vault {
                Some(id) => {
                    let locked = host
                        .vault(id)
                        .with_context(|| format!("Vault {} not found", id))?;
                    print_vault(id, locked, now);
                }
                None if host.registry().is_empty() => println!("No vaults yet"),
                None => {
                    for (id, locked) in host.vaults() {
                        print_vault(id, locked, now);
                    }
                }
            }
            None
        }
        Commands::Balance { account } => {
            let account = Identity::resolve(&account)?;
            println!("{}: {}", account, format_units(host.ledger().balance_of(&account)));
            None
        }
        Commands::Demo => None,
    };

    if let Some(lines) = pending {
        let (_, ledger, recorded, registry) = host.into_parts();
        store
            .commit(
                &HostSnapshot { registry, ledger },
                recorded.events(),
                &mut JsonLinesEventSink::new(&settings.event_log),
            )
            .with_context(|| format!("Failed to save state to {}", store.path().display()))?;
        for line in lines {
            println!("{}", line);
        }
    }

    Ok(())
}

fn print_vault(id: VaultId, vault: &LockedVault, now: u64) {
    println!("Vault {} [{}]", id, vault.state());
    println!("  Owner:   {}", vault.owner().format_short());
    println!("  Balance: {}", format_units(vault.balance()));
    println!("  Created: {}", time::format_timestamp(vault.created_at()));
    println!("  Unlocks: {}", time::format_timestamp(vault.unlock_time()));
    if !vault.is_withdrawn() {
        if vault.is_unlocked(now) {
            println!("  Ready to withdraw");
        } else {
            println!(
                "  Remaining: {}",
                time::format_duration(vault.seconds_until_unlock(now))
            );
        }
    }
}

/// Walk through the vault lifecycle with a manual clock and in-memory ledger
fn run_demo() -> Result<()> {
    let start = SystemClock.now();
    let owner = Identity::from_name("owner");
    let stranger = Identity::random();
    let deposit = vault_config::DEFAULT_DEMO_DEPOSIT;
    let unlock_time = start + vault_config::DEFAULT_LOCK_DURATION_SECS;

    let mut ledger = InMemoryLedger::new();
    ledger.mint(&owner, deposit)?;
    let clock = ManualClock::at(start);
    let mut host = VaultHost::new(&clock, ledger, LogEventSink);

    println!("Owner:    {}", owner);
    println!("Stranger: {}", stranger);
    println!("Now:      {}", time::format_timestamp(start));

    println!("\n1. Lock {} until {}", format_units(deposit), time::format_timestamp(unlock_time));
    let id = host.deploy(&owner, unlock_time, deposit)?;
    println!("   Vault {} created", id);

    println!("\n2. Owner withdraws immediately");
    report(host.withdraw(id, &owner).map(|r| r.amount));

    println!("\n3. Lock with unlock time equal to now");
    report(host.deploy(&owner, start, 0).map(|id| id.0));

    clock.advance_to(unlock_time);
    println!("\n4. Clock advanced to {}", time::format_timestamp(unlock_time));
    println!("   Stranger withdraws");
    report(host.withdraw(id, &stranger).map(|r| r.amount));

    println!("   Owner withdraws");
    report(host.withdraw(id, &owner).map(|r| r.amount));

    clock.advance_by(1);
    println!("\n5. Owner withdraws again one second later");
    report(host.withdraw(id, &owner).map(|r| r.amount));

    println!(
        "\nOwner balance: {}; vault balance: {}",
        format_units(host.ledger().balance_of(&owner)),
        format_units(host.vault(id).map_or(0, LockedVault::balance))
    );
    Ok(())
}

fn report(result: timelock_vault::VaultResult<u64>) {
    match result {
        Ok(value) => println!("   ✅ ok ({})", value),
        Err(e) => println!("   ❌ rejected: {}", e),
    }
}
