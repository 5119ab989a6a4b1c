//! # Error Types for the Timelock Vault
//!
//! Every failed vault operation is a rejection of the attempted transition:
//! nothing is retried internally and no call leaves partial state behind.

use thiserror::Error;

use crate::vaults::VaultId;

/// Main error type for all vault-related operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// Unlock time is not strictly after the creation time
    #[error("unlock time must be in the future")]
    InvalidSchedule { unlock_time: u64, now: u64 },

    /// Withdrawal attempted before the unlock time
    #[error("you can't withdraw yet")]
    NotYetUnlocked { unlock_time: u64, now: u64 },

    /// Caller is not the vault owner
    #[error("you aren't the owner")]
    Unauthorized,

    /// The one-shot withdrawal already happened
    #[error("funds have already been withdrawn")]
    AlreadyWithdrawn,

    /// The ledger refused the outbound payout; vault state was rolled back
    #[error("Transfer of funds failed: {source}")]
    TransferFailed {
        #[source]
        source: LedgerError,
    },

    /// The ledger refused the inbound deposit; no vault was created
    #[error("Deposit could not be collected: {source}")]
    DepositFailed {
        #[source]
        source: LedgerError,
    },

    /// No vault registered under this id
    #[error("Vault {id} not found")]
    VaultNotFound { id: VaultId },

    /// Identity string is not a 20-byte hex account
    #[error("Invalid identity: {value}")]
    InvalidIdentity { value: String },

    /// Persisted state breaks a vault invariant
    #[error("Corrupt vault state: {message}")]
    CorruptState { message: String },

    /// Configuration errors during host setup
    #[error("Vault configuration error: {message}")]
    Configuration { message: String },

    /// File I/O operations
    #[error("File operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON processing error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Create a configuration error with a message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a corrupt state error with a message
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptState {
            message: message.into(),
        }
    }

    /// True for the guard failures of `create` and `withdraw`.
    ///
    /// These are final for the given inputs; only a later clock, the right
    /// caller or a different vault changes the outcome.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            VaultError::InvalidSchedule { .. }
                | VaultError::NotYetUnlocked { .. }
                | VaultError::Unauthorized
                | VaultError::AlreadyWithdrawn
        )
    }

    /// Check if a fresh call might succeed (the ledger side failed)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VaultError::TransferFailed { .. } | VaultError::DepositFailed { .. }
        )
    }
}

/// Value ledger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Account cannot cover the requested amount
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    /// Recipient refuses inbound funds
    #[error("Recipient {recipient} rejected the transfer")]
    RecipientRejected { recipient: String },

    /// Crediting the recipient would overflow its balance
    #[error("Balance overflow crediting {recipient}")]
    BalanceOverflow { recipient: String },
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
