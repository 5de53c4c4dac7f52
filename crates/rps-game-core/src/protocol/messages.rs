//! Protocol messages.
//!
//! A `Transaction` is one authenticated call against a controller, as an
//! external sequencer would deliver it.

use crate::crypto::{Digest, Disclosure};
use crate::games::Move;
use crate::protocol::{Seat, Settlement};
use serde::{Deserialize, Serialize};
use wager_ledger::AccountId;

/// Operation requested by a caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Call {
    /// Join the session, attaching `value`
    AddPlayer { value: u64 },
    /// Submit the digest of a disclosure
    Commit { hidden: Digest },
    /// Disclose the value behind an earlier commitment
    Reveal {
        #[serde(with = "hex::serde")]
        value: Vec<u8>,
    },
    /// Recover funds after a deadline
    Withdraw,
}

/// A call together with the identity that signed it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub caller: AccountId,
    pub call: Call,
}

impl Transaction {
    pub fn add_player(caller: AccountId, value: u64) -> Self {
        Self {
            caller,
            call: Call::AddPlayer { value },
        }
    }

    pub fn commit(caller: AccountId, hidden: Digest) -> Self {
        Self {
            caller,
            call: Call::Commit { hidden },
        }
    }

    pub fn reveal(caller: AccountId, disclosure: &Disclosure) -> Self {
        Self {
            caller,
            call: Call::Reveal {
                value: disclosure.as_bytes().to_vec(),
            },
        }
    }

    pub fn withdraw(caller: AccountId) -> Self {
        Self {
            caller,
            call: Call::Withdraw,
        }
    }
}

/// Outcome of a successful reveal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revealed {
    pub played: Move,
    /// Present when this reveal completed the match
    pub settlement: Option<Settlement>,
}

/// Result of applying a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receipt {
    Joined(Seat),
    Committed,
    Revealed(Revealed),
    Withdrawn(Settlement),
}

impl Receipt {
    /// Settlement produced by this transaction, if it ended the session
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Receipt::Revealed(revealed) => revealed.settlement.as_ref(),
            Receipt::Withdrawn(settlement) => Some(settlement),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Salt;

    #[test]
    fn test_transaction_serialization() {
        let disclosure = Disclosure::new(&Salt::random(), Move::Paper);
        let tx = Transaction::reveal(AccountId::new(), &disclosure);

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(tx, deserialized);
        assert!(json.contains("\"type\":\"reveal\""));
        assert!(json.contains(&hex::encode(disclosure.as_bytes())));
    }

    #[test]
    fn test_commit_message_carries_hex_digest() {
        let disclosure = Disclosure::random(Move::Rock);
        let tx = Transaction::commit(AccountId::new(), disclosure.digest());

        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["call"]["type"], "commit");
        assert_eq!(json["call"]["hidden"], disclosure.digest().to_string());
    }

    #[test]
    fn test_withdraw_parses_from_json() {
        let caller = AccountId::new();
        let json = format!(r#"{{"caller":"{}","call":{{"type":"withdraw"}}}}"#, caller);

        let tx: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, Transaction::withdraw(caller));
    }
}
