//! RPS Game Core Library
//!
//! This crate provides the commitment ledger, move sets and the game
//! controller for the two-player commit-reveal wagering game.

pub mod commit_reveal;
pub mod config;
pub mod controller;
pub mod crypto;
pub mod error;
pub mod games;
pub mod protocol;

pub use commit_reveal::{CommitRecord, CommitRevealError, CommitmentLedger};
pub use config::GameConfig;
pub use controller::{GameController, Participant, Session};
pub use crypto::{Digest, Disclosure, Salt};
pub use error::{GameError, Result};
pub use games::{Move, MoveSet};
pub use protocol::{
    Call, GameResult, Phase, Receipt, Revealed, Seat, SessionId, Settlement, SettlementReason,
    Transaction,
};
