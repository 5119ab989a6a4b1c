//! # Account Identities
//!
//! Opaque, comparable account identities. The vault only ever compares them;
//! the `0x`-prefixed hex form exists for humans and for persistence.

use crate::error::{VaultError, VaultResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of an identity in bytes
pub const IDENTITY_LEN: usize = 20;

/// A caller or owner identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    /// Wrap raw identity bytes
    pub const fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Deterministic identity for a human-readable name.
    ///
    /// Uses the first 20 bytes of `SHA-256(name)`, so the same name always
    /// maps to the same account.
    pub fn from_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut bytes = [0u8; IDENTITY_LEN];
        bytes.copy_from_slice(&digest[..IDENTITY_LEN]);
        Self(bytes)
    }

    /// Fresh random identity
    pub fn random() -> Self {
        let mut bytes = [0u8; IDENTITY_LEN];
        rand::rng().fill(&mut bytes[..]);
        Self(bytes)
    }

    /// Parse a `0x` hex identity, or derive one from a plain name.
    ///
    /// A `0x` value that is not a valid identity is an error, never a name.
    pub fn resolve(value: &str) -> VaultResult<Self> {
        if value.starts_with("0x") {
            value.parse()
        } else {
            Ok(Self::from_name(value))
        }
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// Shortened form for display, e.g. `0x1a2b3c...9f8e`
    pub fn format_short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..8], &full[full.len() - 4..])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

impl FromStr for Identity {
    type Err = VaultError;

    fn from_str(s: &str) -> VaultResult<Self> {
        let invalid = || VaultError::InvalidIdentity {
            value: s.to_string(),
        };

        let digits = s.strip_prefix("0x").ok_or_else(invalid)?;
        let decoded = hex::decode(digits).map_err(|_| invalid())?;
        let bytes: [u8; IDENTITY_LEN] = decoded.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Identity {
    type Error = VaultError;

    fn try_from(value: String) -> VaultResult<Self> {
        value.parse()
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}
