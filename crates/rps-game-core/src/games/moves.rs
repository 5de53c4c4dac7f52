//! Rock-Paper-Scissors and its Lizard-Spock extension.

use crate::protocol::GameResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A move, encoded on the wire as its discriminant byte
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
    Lizard = 3,
    Spock = 4,
}

impl Move {
    /// Byte carried as the last byte of a disclosure
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Decode a byte regardless of move set
    pub fn from_byte(byte: u8) -> Option<Move> {
        match byte {
            0 => Some(Move::Rock),
            1 => Some(Move::Paper),
            2 => Some(Move::Scissors),
            3 => Some(Move::Lizard),
            4 => Some(Move::Spock),
            _ => None,
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Rock, Move::Lizard)
                | (Move::Paper, Move::Rock)
                | (Move::Paper, Move::Spock)
                | (Move::Scissors, Move::Paper)
                | (Move::Scissors, Move::Lizard)
                | (Move::Lizard, Move::Paper)
                | (Move::Lizard, Move::Spock)
                | (Move::Spock, Move::Rock)
                | (Move::Spock, Move::Scissors)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which moves a controller accepts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSet {
    /// Rock, Paper, Scissors
    #[default]
    Classic,
    /// Rock, Paper, Scissors, Lizard, Spock
    Extended,
}

impl MoveSet {
    pub fn moves(&self) -> &'static [Move] {
        match self {
            MoveSet::Classic => &[Move::Rock, Move::Paper, Move::Scissors],
            MoveSet::Extended => &[
                Move::Rock,
                Move::Paper,
                Move::Scissors,
                Move::Lizard,
                Move::Spock,
            ],
        }
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.moves().contains(&mv)
    }

    /// Decode a move byte, rejecting moves outside this set
    pub fn decode(&self, byte: u8) -> Option<Move> {
        Move::from_byte(byte).filter(|mv| self.contains(*mv))
    }

    /// Determine the winner from the two seats' moves
    pub fn judge(&self, move_a: Move, move_b: Move) -> GameResult {
        if move_a == move_b {
            GameResult::Draw
        } else if move_a.beats(&move_b) {
            GameResult::AWins
        } else {
            GameResult::BWins
        }
    }
}

impl fmt::Display for MoveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSet::Classic => write!(f, "classic"),
            MoveSet::Extended => write!(f, "extended"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown move set: {0}")]
pub struct ParseMoveSetError(String);

impl FromStr for MoveSet {
    type Err = ParseMoveSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "rps" | "3" => Ok(MoveSet::Classic),
            "extended" | "rpsls" | "5" => Ok(MoveSet::Extended),
            other => Err(ParseMoveSetError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Move::*;

    fn judge_classic(a: Move, b: Move) -> GameResult {
        MoveSet::Classic.judge(a, b)
    }

    #[test]
    fn test_rock_beats_scissors() {
        assert_eq!(judge_classic(Rock, Scissors), GameResult::AWins);
        assert_eq!(judge_classic(Scissors, Rock), GameResult::BWins);
    }

    #[test]
    fn test_scissors_beats_paper() {
        assert_eq!(judge_classic(Scissors, Paper), GameResult::AWins);
        assert_eq!(judge_classic(Paper, Scissors), GameResult::BWins);
    }

    #[test]
    fn test_paper_beats_rock() {
        assert_eq!(judge_classic(Paper, Rock), GameResult::AWins);
        assert_eq!(judge_classic(Rock, Paper), GameResult::BWins);
    }

    #[test]
    fn test_classic_all_outcomes() {
        let mut a_wins = 0;
        let mut b_wins = 0;
        let mut draws = 0;

        for a in MoveSet::Classic.moves() {
            for b in MoveSet::Classic.moves() {
                match judge_classic(*a, *b) {
                    GameResult::AWins => a_wins += 1,
                    GameResult::BWins => b_wins += 1,
                    GameResult::Draw => draws += 1,
                }
            }
        }

        assert_eq!(a_wins, 3);
        assert_eq!(b_wins, 3);
        assert_eq!(draws, 3);
    }

    #[test]
    fn test_extended_matrix() {
        use GameResult::{AWins as W, BWins as L, Draw as D};

        // Rows: first move, columns: second move, in Rock Paper Scissors Lizard Spock order
        let expected = [
            [D, L, W, W, L],
            [W, D, L, L, W],
            [L, W, D, W, L],
            [L, W, L, D, W],
            [W, L, W, L, D],
        ];

        let moves = MoveSet::Extended.moves();
        for (i, a) in moves.iter().enumerate() {
            for (j, b) in moves.iter().enumerate() {
                assert_eq!(
                    MoveSet::Extended.judge(*a, *b),
                    expected[i][j],
                    "{} vs {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_extended_each_move_beats_two() {
        let moves = MoveSet::Extended.moves();
        for a in moves {
            let wins = moves.iter().filter(|b| a.beats(b)).count();
            let losses = moves.iter().filter(|b| b.beats(a)).count();
            assert_eq!(wins, 2, "{} should beat two moves", a);
            assert_eq!(losses, 2, "{} should lose to two moves", a);
        }
    }

    #[test]
    fn test_classic_restricts_decoding() {
        assert_eq!(MoveSet::Classic.decode(0), Some(Rock));
        assert_eq!(MoveSet::Classic.decode(2), Some(Scissors));
        assert_eq!(MoveSet::Classic.decode(3), None);
        assert_eq!(MoveSet::Extended.decode(3), Some(Lizard));
        assert_eq!(MoveSet::Extended.decode(4), Some(Spock));
        assert_eq!(MoveSet::Extended.decode(5), None);
    }

    #[test]
    fn test_byte_encoding() {
        for mv in MoveSet::Extended.moves() {
            assert_eq!(Move::from_byte(mv.to_byte()), Some(*mv));
        }
        assert_eq!(Move::from_byte(0xff), None);
    }

    #[test]
    fn test_move_set_parsing() {
        assert_eq!("classic".parse::<MoveSet>().unwrap(), MoveSet::Classic);
        assert_eq!("RPSLS".parse::<MoveSet>().unwrap(), MoveSet::Extended);
        assert_eq!("5".parse::<MoveSet>().unwrap(), MoveSet::Extended);
        assert!("chess".parse::<MoveSet>().is_err());
    }
}
