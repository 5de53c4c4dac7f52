//! Protocol types and messages.

mod messages;
mod settlement;
mod types;

pub use messages::{Call, Receipt, Revealed, Transaction};
pub use settlement::{Settlement, SettlementReason};
pub use types::{GameResult, Phase, Seat, SessionId};
