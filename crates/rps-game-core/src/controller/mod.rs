//! Game controller: the session state machine.
//!
//! ```text
//! WaitingForPlayers -> Committing -> Revealing -> Settled -> WaitingForPlayers
//! ```
//!
//! Every operation is one atomic transaction. State is checkpointed before
//! the operation runs and restored if it fails, so a rejected call leaves no
//! trace. Settlement resets the session before value leaves custody.

mod payouts;
mod session;

pub use session::{Participant, Session};

use crate::commit_reveal::{CommitRecord, CommitmentLedger};
use crate::config::GameConfig;
use crate::crypto::Digest;
use crate::error::{GameError, Result};
use crate::games::Move;
use crate::protocol::{
    Call, Phase, Receipt, Revealed, Seat, Settlement, SettlementReason, Transaction,
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use wager_ledger::{AccountId, Ledger, Transfer};

/// Everything a failed operation must roll back
#[derive(Clone, Debug, Default)]
struct GameState {
    session: Session,
    commitments: CommitmentLedger,
    last_settlement: Option<Settlement>,
}

/// Owns one session at a time and runs it against a ledger
pub struct GameController<L: Ledger> {
    config: GameConfig,
    ledger: L,
    state: GameState,
}

impl<L: Ledger> GameController<L> {
    pub fn new(config: GameConfig, ledger: L) -> Result<Self> {
        config.validate()?;

        let state = GameState::default();
        info!(
            "Controller ready: {} moves, wager {}, session {}",
            config.move_set, config.wager, state.session.id
        );

        Ok(Self {
            config,
            ledger,
            state,
        })
    }

    // Queries

    /// Hash a candidate disclosed value
    pub fn digest(value: &[u8]) -> Digest {
        CommitmentLedger::digest(value)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn phase(&self) -> Phase {
        self.state.session.phase
    }

    pub fn participants(&self) -> &[Participant] {
        self.state.session.participants()
    }

    pub fn pot(&self) -> u64 {
        self.state.session.pot
    }

    pub fn commit_deadline(&self) -> Option<DateTime<Utc>> {
        self.state.session.commit_deadline
    }

    pub fn reveal_deadline(&self) -> Option<DateTime<Utc>> {
        self.state.session.reveal_deadline
    }

    pub fn commit_count(&self) -> u32 {
        self.state.commitments.commit_count()
    }

    pub fn reveal_count(&self) -> u32 {
        self.state.commitments.reveal_count()
    }

    pub fn commitment(&self, account: &AccountId) -> Option<&CommitRecord> {
        self.state.commitments.record(account)
    }

    /// Move revealed by `account` in the current session
    pub fn participant_move(&self, account: &AccountId) -> Option<Move> {
        self.state
            .session
            .participant(account)
            .and_then(|p| p.played)
    }

    /// How the previous session ended
    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.state.last_settlement.as_ref()
    }

    // Operations

    /// Join the running session, attaching `value`
    pub fn add_player(&mut self, caller: AccountId, value: u64) -> Result<Seat> {
        self.transact(|game| {
            let session = &game.state.session;
            if session.participant(&caller).is_some() {
                return Err(GameError::AlreadyJoined);
            }
            if session.is_full() {
                return Err(GameError::TooManyPlayers);
            }
            game.expect_phase(Phase::WaitingForPlayers)?;
            if value != game.config.wager {
                return Err(GameError::WrongWager {
                    expected: game.config.wager,
                    got: value,
                });
            }

            let seat = session.next_seat();
            let session = &mut game.state.session;
            session.participants.push(Participant {
                account: caller,
                seat,
                wager: value,
                played: None,
            });
            session.pot += value;
            info!("Player {} joined session {} as {}", caller, session.id, seat);

            if session.is_full() {
                let deadline = game.deadline_after(game.config.commit_window())?;
                game.state.session.commit_deadline = Some(deadline);
                game.enter_phase(Phase::Committing);
            }

            game.ledger
                .deposit(&caller, value)
                .map_err(GameError::DepositFailed)?;
            Ok(seat)
        })
    }

    /// Record the caller's hidden commitment
    pub fn commit(&mut self, caller: AccountId, hidden: Digest) -> Result<()> {
        self.transact(|game| {
            game.expect_participant(&caller)?;
            game.expect_phase(Phase::Committing)?;

            game.state.commitments.commit(caller, hidden)?;
            info!("Player {} committed in session {}", caller, game.state.session.id);

            let all_committed = game
                .state
                .session
                .participants
                .iter()
                .all(|p| game.state.commitments.has_committed(&p.account));
            if all_committed {
                let deadline = game.deadline_after(game.config.reveal_window())?;
                game.state.session.reveal_deadline = Some(deadline);
                game.enter_phase(Phase::Revealing);
            }
            Ok(())
        })
    }

    /// Disclose the value behind the caller's commitment
    ///
    /// The second reveal judges the match and pays out before returning.
    pub fn reveal(&mut self, caller: AccountId, value: &[u8]) -> Result<Revealed> {
        self.transact(|game| {
            game.expect_participant(&caller)?;
            game.expect_phase(Phase::Revealing)?;

            let byte = game.state.commitments.verify(&caller, value)?;
            let played = game
                .config
                .move_set
                .decode(byte)
                .ok_or(GameError::InvalidMove(byte))?;
            game.state.commitments.reveal(&caller, value)?;

            if let Some(participant) = game.state.session.participant_mut(&caller) {
                participant.played = Some(played);
            }
            info!(
                "Player {} revealed {} in session {}",
                caller, played, game.state.session.id
            );

            let settlement = if game.state.session.all_revealed() {
                Some(game.resolve_outcome()?)
            } else {
                None
            };
            Ok(Revealed { played, settlement })
        })
    }

    /// Recover funds once the current phase's deadline has been reached
    pub fn withdraw(&mut self, caller: AccountId) -> Result<Settlement> {
        self.transact(|game| {
            game.expect_participant(&caller)?;
            let now = game.ledger.now();
            let session = &game.state.session;

            match session.phase {
                // Nobody to play against yet; the lone participant may leave
                Phase::WaitingForPlayers => {
                    let refunds = payouts::refund_all(session);
                    game.settle(SettlementReason::Cancelled, refunds)
                }
                Phase::Committing => {
                    deadline_reached(session.commit_deadline, now)?;
                    let refunds = payouts::refund_all(session);
                    game.settle(SettlementReason::CommitTimeout, refunds)
                }
                Phase::Revealing => {
                    deadline_reached(session.reveal_deadline, now)?;
                    let revealed: Vec<Seat> = session
                        .participants
                        .iter()
                        .filter(|p| p.played.is_some())
                        .map(|p| p.seat)
                        .collect();

                    match revealed.as_slice() {
                        [] => {
                            let refunds = payouts::refund_all(session);
                            game.settle(SettlementReason::RevealTimeout, refunds)
                        }
                        [winner] => {
                            let award = payouts::award_pot(session, *winner);
                            game.settle(SettlementReason::RevealForfeit { winner: *winner }, award)
                        }
                        _ => game.resolve_outcome(),
                    }
                }
                Phase::Settled => Err(GameError::WrongPhase {
                    expected: Phase::Revealing,
                    actual: Phase::Settled,
                }),
            }
        })
    }

    /// Dispatch a sequenced transaction
    pub fn apply(&mut self, tx: &Transaction) -> Result<Receipt> {
        debug!("Applying {:?} from {}", tx.call, tx.caller);

        match &tx.call {
            Call::AddPlayer { value } => self.add_player(tx.caller, *value).map(Receipt::Joined),
            Call::Commit { hidden } => self.commit(tx.caller, *hidden).map(|_| Receipt::Committed),
            Call::Reveal { value } => self.reveal(tx.caller, value).map(Receipt::Revealed),
            Call::Withdraw => self.withdraw(tx.caller).map(Receipt::Withdrawn),
        }
    }

    // Internals

    /// Run `op` as one transaction: on error every state change is undone
    fn transact<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.state.clone();
        let result = op(self);
        if let Err(e) = &result {
            debug!("Transaction rejected: {}", e);
            self.state = checkpoint;
        }
        result
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        let actual = self.state.session.phase;
        if actual != expected {
            return Err(GameError::WrongPhase { expected, actual });
        }
        Ok(())
    }

    fn expect_participant(&self, caller: &AccountId) -> Result<()> {
        if self.state.session.participant(caller).is_none() {
            return Err(GameError::NotInGame);
        }
        Ok(())
    }

    /// Ledger time plus `window`, failing instead of overflowing the clock
    fn deadline_after(&self, window: Duration) -> Result<DateTime<Utc>> {
        let now = self.ledger.now();
        now.checked_add_signed(window).ok_or_else(|| {
            GameError::InvalidConfig(format!(
                "window of {}s runs past the end of the ledger clock at {}",
                window.num_seconds(),
                now
            ))
        })
    }

    fn enter_phase(&mut self, phase: Phase) {
        let session = &mut self.state.session;
        debug_assert!(phase >= session.phase, "phase may only move forward");
        info!("Session {}: {} -> {}", session.id, session.phase, phase);
        session.phase = phase;
    }

    /// Judge two revealed moves and pay out
    fn resolve_outcome(&mut self) -> Result<Settlement> {
        let session = &self.state.session;
        let (Some(move_a), Some(move_b)) = (
            session.at_seat(Seat::A).and_then(|p| p.played),
            session.at_seat(Seat::B).and_then(|p| p.played),
        ) else {
            return Err(GameError::WrongPhase {
                expected: Phase::Revealing,
                actual: session.phase,
            });
        };

        let result = self.config.move_set.judge(move_a, move_b);
        let transfers = match result.winner() {
            Some(seat) => payouts::award_pot(session, seat),
            None => payouts::refund_all(session),
        };
        info!(
            "Session {}: {} vs {}, {}",
            session.id, move_a, move_b, result
        );

        self.settle(SettlementReason::Outcome(result), transfers)
    }

    /// Close the session, start a fresh one, then release value from custody
    fn settle(&mut self, reason: SettlementReason, transfers: Vec<Transfer>) -> Result<Settlement> {
        self.enter_phase(Phase::Settled);

        let finished = std::mem::take(&mut self.state.session);
        self.state.commitments.clear();

        let settlement = Settlement {
            session_id: finished.id,
            reason,
            pot: finished.pot,
            payouts: transfers,
            moves: finished.moves(),
            settled_at: self.ledger.now(),
        };
        debug_assert_eq!(settlement.total_paid(), settlement.pot);
        self.state.last_settlement = Some(settlement.clone());

        info!(
            "Session {} settled ({:?}), paying out {}; next session {}",
            finished.id, reason, settlement.pot, self.state.session.id
        );

        // State already reflects the payout; a failure rolls it all back
        self.ledger.payout(&settlement.payouts).map_err(|e| {
            warn!("Payout for session {} failed: {}", finished.id, e);
            GameError::TransferFailed(e)
        })?;

        Ok(settlement)
    }
}

fn deadline_reached(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<()> {
    match deadline {
        Some(deadline) if now < deadline => Err(GameError::DeadlineNotReached { deadline }),
        _ => Ok(()),
    }
}
