//! Commitment ledger.
//!
//! Records one hidden digest per identity and later checks a disclosed value
//! against it. Knows nothing about game rules: a successful reveal hands back
//! the last byte of the disclosed value and leaves its meaning to the caller.

use crate::crypto::Digest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use wager_ledger::AccountId;

/// Commit-reveal integrity violations
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommitRevealError {
    #[error("Commitment already submitted")]
    AlreadyCommitted,

    #[error("No commitment to reveal")]
    NoSuchCommitment,

    #[error("Commitment already revealed")]
    AlreadyRevealed,

    #[error("Disclosed value does not match the commitment")]
    HashMismatch,

    #[error("Disclosed value is empty")]
    EmptyValue,
}

/// One identity's commitment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hidden: Digest,
    pub revealed: bool,
}

/// Round-scoped store of commitments
#[derive(Clone, Debug, Default)]
pub struct CommitmentLedger {
    records: HashMap<AccountId, CommitRecord>,
    commit_count: u32,
    reveal_count: u32,
}

impl CommitmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a candidate value. Pure, so clients can precompute commitments.
    pub fn digest(value: &[u8]) -> Digest {
        Digest::of(value)
    }

    /// Record `hidden` for `who`
    pub fn commit(&mut self, who: AccountId, hidden: Digest) -> Result<(), CommitRevealError> {
        if self.records.contains_key(&who) {
            return Err(CommitRevealError::AlreadyCommitted);
        }

        self.records.insert(
            who,
            CommitRecord {
                hidden,
                revealed: false,
            },
        );
        self.commit_count += 1;

        tracing::debug!("Commitment {:?} recorded for {}", hidden, who);
        Ok(())
    }

    /// Check `value` against the commitment of `who` without recording anything
    ///
    /// Returns the trailing byte of the value.
    pub fn verify(&self, who: &AccountId, value: &[u8]) -> Result<u8, CommitRevealError> {
        let record = self
            .records
            .get(who)
            .ok_or(CommitRevealError::NoSuchCommitment)?;

        if record.revealed {
            return Err(CommitRevealError::AlreadyRevealed);
        }
        if !record.hidden.matches(value) {
            return Err(CommitRevealError::HashMismatch);
        }

        value.last().copied().ok_or(CommitRevealError::EmptyValue)
    }

    /// Disclose the value behind the commitment of `who`
    ///
    /// Returns the trailing byte of the value.
    pub fn reveal(&mut self, who: &AccountId, value: &[u8]) -> Result<u8, CommitRevealError> {
        let byte = self.verify(who, value)?;

        if let Some(record) = self.records.get_mut(who) {
            record.revealed = true;
        }
        self.reveal_count += 1;

        tracing::debug!("Commitment of {} revealed", who);
        Ok(byte)
    }

    pub fn record(&self, who: &AccountId) -> Option<&CommitRecord> {
        self.records.get(who)
    }

    pub fn has_committed(&self, who: &AccountId) -> bool {
        self.records.contains_key(who)
    }

    pub fn has_revealed(&self, who: &AccountId) -> bool {
        self.records.get(who).map_or(false, |r| r.revealed)
    }

    pub fn commit_count(&self) -> u32 {
        self.commit_count
    }

    pub fn reveal_count(&self) -> u32 {
        self.reveal_count
    }

    /// Forget every commitment and reset the counters for a new round
    pub fn clear(&mut self) {
        self.records.clear();
        self.commit_count = 0;
        self.reveal_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [u8; 32] = [
        0x4f, 0x84, 0x77, 0x46, 0x97, 0xbe, 0x7f, 0x74, 0x8e, 0xfe, 0x66, 0xf5, 0xd3, 0x94,
        0x73, 0x9a, 0xa6, 0xa3, 0xa2, 0x4a, 0x17, 0x8e, 0x0b, 0x05, 0x9a, 0x72, 0x45, 0xa1,
        0x7b, 0x6c, 0x27, 0x01,
    ];

    #[test]
    fn test_commit_records_hash() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();
        let hidden = CommitmentLedger::digest(&DATA);

        ledger.commit(owner, hidden).unwrap();

        let record = ledger.record(&owner).unwrap();
        assert_eq!(record.hidden, hidden);
        assert!(!record.revealed);
        assert_eq!(ledger.commit_count(), 1);
    }

    #[test]
    fn test_reveal_marks_revealed_and_returns_last_byte() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();

        ledger.commit(owner, CommitmentLedger::digest(&DATA)).unwrap();
        let byte = ledger.reveal(&owner, &DATA).unwrap();

        assert_eq!(byte, 0x01);
        assert!(ledger.record(&owner).unwrap().revealed);
        assert_eq!(ledger.reveal_count(), 1);
    }

    #[test]
    fn test_double_commit_fails() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();

        ledger.commit(owner, Digest::of(b"first")).unwrap();
        let result = ledger.commit(owner, Digest::of(b"second"));

        assert_eq!(result, Err(CommitRevealError::AlreadyCommitted));
        assert_eq!(ledger.record(&owner).unwrap().hidden, Digest::of(b"first"));
        assert_eq!(ledger.commit_count(), 1);
    }

    #[test]
    fn test_reveal_without_commit_fails() {
        let mut ledger = CommitmentLedger::new();

        let result = ledger.reveal(&AccountId::new(), &DATA);
        assert_eq!(result, Err(CommitRevealError::NoSuchCommitment));
    }

    #[test]
    fn test_reveal_twice_fails() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();

        ledger.commit(owner, CommitmentLedger::digest(&DATA)).unwrap();
        ledger.reveal(&owner, &DATA).unwrap();

        assert_eq!(
            ledger.reveal(&owner, &DATA),
            Err(CommitRevealError::AlreadyRevealed)
        );
        assert_eq!(ledger.reveal_count(), 1);
    }

    #[test]
    fn test_wrong_value_fails() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();
        let mut tampered = DATA;
        tampered[31] = 0x02;

        ledger.commit(owner, CommitmentLedger::digest(&DATA)).unwrap();

        assert_eq!(
            ledger.reveal(&owner, &tampered),
            Err(CommitRevealError::HashMismatch)
        );
        assert!(!ledger.has_revealed(&owner));
    }

    #[test]
    fn test_empty_value_has_no_move_byte() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();

        ledger.commit(owner, CommitmentLedger::digest(&[])).unwrap();

        assert_eq!(ledger.reveal(&owner, &[]), Err(CommitRevealError::EmptyValue));
        assert_eq!(ledger.reveal_count(), 0);
    }

    #[test]
    fn test_verify_does_not_mutate() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();
        ledger.commit(owner, CommitmentLedger::digest(&DATA)).unwrap();

        assert_eq!(ledger.verify(&owner, &DATA), Ok(0x01));
        assert!(!ledger.has_revealed(&owner));
        assert_eq!(ledger.reveal_count(), 0);
    }

    #[test]
    fn test_identities_are_independent() {
        let mut ledger = CommitmentLedger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();

        ledger.commit(alice, CommitmentLedger::digest(&DATA)).unwrap();

        // Bob cannot open Alice's commitment
        assert_eq!(
            ledger.reveal(&bob, &DATA),
            Err(CommitRevealError::NoSuchCommitment)
        );
        assert!(ledger.has_committed(&alice));
        assert!(!ledger.has_committed(&bob));
    }

    #[test]
    fn test_clear_starts_new_round() {
        let mut ledger = CommitmentLedger::new();
        let owner = AccountId::new();
        ledger.commit(owner, CommitmentLedger::digest(&DATA)).unwrap();
        ledger.reveal(&owner, &DATA).unwrap();

        ledger.clear();

        assert_eq!(ledger.commit_count(), 0);
        assert_eq!(ledger.reveal_count(), 0);
        assert!(ledger.record(&owner).is_none());
        ledger.commit(owner, CommitmentLedger::digest(&DATA)).unwrap();
    }
}
