use crate::commit_reveal::CommitRevealError;
use crate::protocol::Phase;
use chrono::{DateTime, Utc};
use thiserror::Error;
use wager_ledger::LedgerError;

pub type Result<T> = std::result::Result<T, GameError>;

/// Every way an operation on the game controller can be rejected
///
/// A rejected operation leaves the controller exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Already joined")]
    AlreadyJoined,

    #[error("Too many players")]
    TooManyPlayers,

    #[error("Wrong wager: expected {expected}, got {got}")]
    WrongWager { expected: u64, got: u64 },

    #[error("Caller is not in the game")]
    NotInGame,

    #[error("Wrong phase: expected {expected}, session is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error(transparent)]
    CommitReveal(#[from] CommitRevealError),

    #[error("Invalid move byte: {0}")]
    InvalidMove(u8),

    #[error("Deadline not reached: withdrawal opens at {deadline}")]
    DeadlineNotReached { deadline: DateTime<Utc> },

    #[error("Deposit failed: {0}")]
    DepositFailed(#[source] LedgerError),

    #[error("Transfer failed: {0}")]
    TransferFailed(#[source] LedgerError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// Whether resubmitting the same call later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GameError::DeadlineNotReached { .. }
                | GameError::DepositFailed(_)
                | GameError::TransferFailed(_)
        )
    }
}
