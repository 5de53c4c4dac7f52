//! Ledger trait definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identity of an account on the ledger
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random account ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from ledger operations
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    #[error("Insufficient funds in {account}: need {need}, have {available}")]
    InsufficientFunds {
        account: AccountId,
        need: u64,
        available: u64,
    },

    #[error("Insufficient custody balance: need {need}, have {available}")]
    InsufficientCustody { need: u64, available: u64 },

    #[error("Transfer rejected by recipient {0}")]
    TransferRejected(AccountId),

    #[error("Balance overflow")]
    Overflow,
}

/// A single outgoing value movement from custody
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: AccountId,
    pub amount: u64,
}

impl Transfer {
    pub fn new(to: AccountId, amount: u64) -> Self {
        Self { to, amount }
    }
}

/// Trait for the shared ledger a game runs against
///
/// The ledger provides the timestamp used for deadline checks and holds
/// wagered value in custody between deposit and payout.
/// Implementations can be:
/// - MockLedger for testing
/// - An adapter over a real chain or payment network
pub trait Ledger: Send + Sync {
    /// Current ledger timestamp
    fn now(&self) -> DateTime<Utc>;

    /// Move `amount` from `from` into custody
    fn deposit(&self, from: &AccountId, amount: u64) -> Result<(), LedgerError>;

    /// Pay out of custody. Either every transfer lands or none does.
    fn payout(&self, transfers: &[Transfer]) -> Result<(), LedgerError>;

    /// Spendable balance of an account
    fn balance(&self, account: &AccountId) -> Result<u64, LedgerError>;
}
