//! Record of how a session ended and who was paid.

use crate::games::Move;
use crate::protocol::{GameResult, Seat, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wager_ledger::{AccountId, Transfer};

/// Why a session settled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementReason {
    /// Both moves were revealed and judged
    Outcome(GameResult),
    /// Only `winner` revealed before the reveal deadline
    RevealForfeit { winner: Seat },
    /// The commit deadline passed before both committed; wagers refunded
    CommitTimeout,
    /// Nobody revealed before the reveal deadline; wagers refunded
    RevealTimeout,
    /// The only participant left before an opponent joined
    Cancelled,
}

/// Final accounting of a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub session_id: SessionId,
    pub reason: SettlementReason,
    /// Value held by the session when it settled
    pub pot: u64,
    pub payouts: Vec<Transfer>,
    /// Revealed moves, indexed by seat
    pub moves: [Option<Move>; 2],
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    pub fn total_paid(&self) -> u64 {
        self.payouts.iter().map(|t| t.amount).sum()
    }

    /// Amount paid to `account` by this settlement
    pub fn paid_to(&self, account: &AccountId) -> u64 {
        self.payouts
            .iter()
            .filter(|t| t.to == *account)
            .map(|t| t.amount)
            .sum()
    }

    pub fn move_of(&self, seat: Seat) -> Option<Move> {
        self.moves[seat.index()]
    }

    /// The seat that took the whole pot, if any
    pub fn winner(&self) -> Option<Seat> {
        match self.reason {
            SettlementReason::Outcome(result) => result.winner(),
            SettlementReason::RevealForfeit { winner } => Some(winner),
            _ => None,
        }
    }
}
