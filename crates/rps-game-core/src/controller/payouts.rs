//! Payout computation for each way a session can end.
//!
//! Every function returns transfers summing to exactly the session pot.

use super::session::Session;
use crate::protocol::Seat;
use wager_ledger::Transfer;

/// Each participant gets their own wager back
pub(crate) fn refund_all(session: &Session) -> Vec<Transfer> {
    session
        .participants()
        .iter()
        .filter(|p| p.wager > 0)
        .map(|p| Transfer::new(p.account, p.wager))
        .collect()
}

/// The participant at `seat` receives the whole pot
pub(crate) fn award_pot(session: &Session, seat: Seat) -> Vec<Transfer> {
    match session.at_seat(seat) {
        Some(winner) if session.pot() > 0 => vec![Transfer::new(winner.account, session.pot())],
        _ => Vec::new(),
    }
}
