//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier of one match between two participants
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID
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

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    AWins,
    BWins,
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::AWins => "A wins",
            GameResult::BWins => "B wins",
            GameResult::Draw => "Draw",
        }
    }

    /// The winning seat, if any
    pub fn winner(&self) -> Option<Seat> {
        match self {
            GameResult::AWins => Some(Seat::A),
            GameResult::BWins => Some(Seat::B),
            GameResult::Draw => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Participant slot, in join order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    /// Get the opponent
    pub fn opponent(&self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::A => write!(f, "A"),
            Seat::B => write!(f, "B"),
        }
    }
}

/// Lifecycle stage of a session
///
/// Ordered: a session only moves forward until it settles and a new one
/// starts back at `WaitingForPlayers`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    WaitingForPlayers,
    Committing,
    Revealing,
    Settled,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::WaitingForPlayers => "waiting for players",
            Phase::Committing => "committing",
            Phase::Revealing => "revealing",
            Phase::Settled => "settled",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_generation() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_seat_opponent() {
        assert_eq!(Seat::A.opponent(), Seat::B);
        assert_eq!(Seat::B.opponent(), Seat::A);
    }

    #[test]
    fn test_game_result_winner() {
        assert_eq!(GameResult::AWins.winner(), Some(Seat::A));
        assert_eq!(GameResult::BWins.winner(), Some(Seat::B));
        assert_eq!(GameResult::Draw.winner(), None);
        assert_eq!(GameResult::Draw.as_str(), "Draw");
    }

    #[test]
    fn test_phase_order() {
        assert!(Phase::WaitingForPlayers < Phase::Committing);
        assert!(Phase::Committing < Phase::Revealing);
        assert!(Phase::Revealing < Phase::Settled);
    }
}
