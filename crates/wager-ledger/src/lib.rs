//! Wager Ledger Library
//!
//! Shared value-ledger primitives for wagering games:
//! - AccountId for participant identities
//! - Ledger trait (clock, custody deposits, atomic payouts)
//! - MockLedger with simulated time for tests and demos

pub mod ledger;

pub use ledger::{AccountId, Ledger, LedgerError, MockLedger, Transfer};
