//! Session aggregate: participants, pot and deadlines of the running match.

use crate::games::Move;
use crate::protocol::{Phase, Seat, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wager_ledger::AccountId;

/// A joined participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub account: AccountId,
    pub seat: Seat,
    pub wager: u64,
    /// Set only after a verified reveal
    pub played: Option<Move>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) phase: Phase,
    pub(crate) participants: Vec<Participant>,
    pub(crate) pot: u64,
    pub(crate) commit_deadline: Option<DateTime<Utc>>,
    pub(crate) reveal_deadline: Option<DateTime<Utc>>,
}

impl Session {
    pub const MAX_PARTICIPANTS: usize = 2;

    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            phase: Phase::WaitingForPlayers,
            participants: Vec::with_capacity(Self::MAX_PARTICIPANTS),
            pot: 0,
            commit_deadline: None,
            reveal_deadline: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn commit_deadline(&self) -> Option<DateTime<Utc>> {
        self.commit_deadline
    }

    pub fn reveal_deadline(&self) -> Option<DateTime<Utc>> {
        self.reveal_deadline
    }

    pub fn participant(&self, account: &AccountId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.account == *account)
    }

    pub(crate) fn participant_mut(&mut self, account: &AccountId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.account == *account)
    }

    pub fn at_seat(&self, seat: Seat) -> Option<&Participant> {
        self.participants.iter().find(|p| p.seat == seat)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= Self::MAX_PARTICIPANTS
    }

    /// Seat the next participant to join would take
    pub(crate) fn next_seat(&self) -> Seat {
        if self.participants.is_empty() {
            Seat::A
        } else {
            Seat::B
        }
    }

    /// Revealed moves indexed by seat
    pub fn moves(&self) -> [Option<Move>; 2] {
        let mut moves = [None; 2];
        for p in &self.participants {
            moves[p.seat.index()] = p.played;
        }
        moves
    }

    pub fn all_revealed(&self) -> bool {
        self.is_full() && self.participants.iter().all(|p| p.played.is_some())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
