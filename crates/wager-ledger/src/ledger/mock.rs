//! Mock ledger for testing.

use super::traits::{AccountId, Ledger, LedgerError, Transfer};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

struct MockLedgerState {
    /// Map of account -> spendable balance
    accounts: HashMap<AccountId, u64>,
    /// Value held on behalf of running games
    custody: u64,
    /// Simulated current time
    current_time: DateTime<Utc>,
    /// Recipients whose incoming payouts fail
    rejecting: HashSet<AccountId>,
}

/// In-memory mock ledger for testing
///
/// Cloning shares the underlying state, so a test can keep a handle while
/// a controller owns another.
#[derive(Clone)]
pub struct MockLedger {
    inner: Arc<Mutex<MockLedgerState>>,
}

impl MockLedger {
    /// Create a new ledger whose clock starts at the real current time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a new ledger whose clock starts at `time`
    pub fn starting_at(time: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockLedgerState {
                accounts: HashMap::new(),
                custody: 0,
                current_time: time,
                rejecting: HashSet::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockLedgerState> {
        self.inner.lock().expect("mock ledger lock poisoned")
    }

    /// Open a fresh account holding `initial_balance`
    pub fn open_account(&self, initial_balance: u64) -> AccountId {
        let account = AccountId::new();
        self.state().accounts.insert(account, initial_balance);
        account
    }

    /// Credit an account, opening it if needed
    pub fn fund(&self, account: AccountId, amount: u64) {
        let mut state = self.state();
        let balance = state.accounts.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Balance of an account (zero if it was never opened)
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.state().accounts.get(account).copied().unwrap_or(0)
    }

    /// Value currently held in custody
    pub fn custody_balance(&self) -> u64 {
        self.state().custody
    }

    /// Sum of every account balance plus custody
    pub fn total_value(&self) -> u64 {
        let state = self.state();
        state.accounts.values().sum::<u64>() + state.custody
    }

    /// Advance simulated time by seconds
    pub fn advance_time(&self, seconds: i64) {
        let mut state = self.state();
        state.current_time += Duration::seconds(seconds);
    }

    /// Make every payout to `account` fail until `accept_payouts_to` is called
    pub fn reject_payouts_to(&self, account: AccountId) {
        self.state().rejecting.insert(account);
    }

    pub fn accept_payouts_to(&self, account: &AccountId) {
        self.state().rejecting.remove(account);
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for MockLedger {
    fn now(&self) -> DateTime<Utc> {
        self.state().current_time
    }

    fn deposit(&self, from: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let mut state = self.state();
        let custody = state.custody.checked_add(amount).ok_or(LedgerError::Overflow)?;

        let balance = state
            .accounts
            .get_mut(from)
            .ok_or(LedgerError::UnknownAccount(*from))?;
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                need: amount,
                available: *balance,
            });
        }

        *balance -= amount;
        state.custody = custody;
        Ok(())
    }

    fn payout(&self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        let mut state = self.state();

        // Validate the whole batch before touching any balance
        let total = transfers
            .iter()
            .try_fold(0u64, |acc, t| acc.checked_add(t.amount))
            .ok_or(LedgerError::Overflow)?;
        if total > state.custody {
            return Err(LedgerError::InsufficientCustody {
                need: total,
                available: state.custody,
            });
        }
        if let Some(t) = transfers.iter().find(|t| state.rejecting.contains(&t.to)) {
            return Err(LedgerError::TransferRejected(t.to));
        }

        let mut credited: HashMap<AccountId, u64> = HashMap::new();
        for t in transfers {
            let current = match credited.get(&t.to) {
                Some(balance) => *balance,
                None => state.accounts.get(&t.to).copied().unwrap_or(0),
            };
            let balance = current.checked_add(t.amount).ok_or(LedgerError::Overflow)?;
            credited.insert(t.to, balance);
        }

        state.accounts.extend(credited);
        state.custody -= total;

        tracing::debug!("Mock ledger paid out {} in {} transfers", total, transfers.len());
        Ok(())
    }

    fn balance(&self, account: &AccountId) -> Result<u64, LedgerError> {
        self.state()
            .accounts
            .get(account)
            .copied()
            .ok_or(LedgerError::UnknownAccount(*account))
    }
}
