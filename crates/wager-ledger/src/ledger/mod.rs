//! Ledger abstraction.

mod mock;
mod traits;

pub use mock::MockLedger;
pub use traits::{AccountId, Ledger, LedgerError, Transfer};
