//! RPS Game Demo
//!
//! Runs one wagered match between two simulated players against a mock
//! ledger. A sequencer task owns the controller and applies transactions one
//! at a time, in arrival order.
//!
//! Environment:
//! - `RPS_CONFIG` - path to a JSON `GameConfig` (overrides the variables below)
//! - `RPS_MOVE_SET` - `classic` or `extended` (default classic)
//! - `RPS_WAGER` - wager per player (default 1000)
//! - `RPS_COMMIT_WINDOW_SECS`, `RPS_REVEAL_WINDOW_SECS` - deadline windows
//! - `RPS_STALL` - player B never reveals; player A withdraws after the deadline
//! - `RUST_LOG` - log filter (default `info`)

use rand::seq::SliceRandom;
use rps_game_core::config::DEFAULT_WINDOW_SECS;
use rps_game_core::{
    Disclosure, GameConfig, GameController, GameError, Move, MoveSet, Receipt, Settlement,
    Transaction,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Barrier};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wager_ledger::{AccountId, MockLedger};

const DEFAULT_WAGER: u64 = 1_000;

/// Wagers each simulated player can afford
const STARTING_WAGERS: u64 = 10;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
enum DemoError {
    #[error("Invalid setting {name}: {reason}")]
    Setting { name: &'static str, reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Sequencer stopped")]
    SequencerClosed,

    #[error("Player task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

// ============================================================================
// Configuration
// ============================================================================

struct DemoConfig {
    game: GameConfig,
    stall: bool,
}

impl DemoConfig {
    fn from_env() -> Result<Self, DemoError> {
        let game = match std::env::var("RPS_CONFIG") {
            Ok(path) => {
                info!("Loading game config from {}", path);
                serde_json::from_str(&std::fs::read_to_string(path)?)?
            }
            Err(_) => {
                let move_set = env_or("RPS_MOVE_SET", MoveSet::Classic)?;
                let wager = env_or("RPS_WAGER", DEFAULT_WAGER)?;
                GameConfig::new(move_set, wager)
                    .with_commit_window(env_or("RPS_COMMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)?)
                    .with_reveal_window(env_or("RPS_REVEAL_WINDOW_SECS", DEFAULT_WINDOW_SECS)?)
            }
        };
        let stall = std::env::var("RPS_STALL")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self { game, stall })
    }
}

fn env_or<T>(name: &'static str, default: T) -> Result<T, DemoError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| DemoError::Setting {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

// ============================================================================
// Sequencer
// ============================================================================

struct Request {
    tx: Transaction,
    reply: oneshot::Sender<Result<Receipt, GameError>>,
}

#[derive(Clone)]
struct Sequencer {
    sender: mpsc::Sender<Request>,
}

impl Sequencer {
    /// Start the task that owns `game`
    fn spawn(game: GameController<MockLedger>) -> (Self, tokio::task::JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(32);
        let handle = tokio::spawn(run_sequencer(game, receiver));
        (Self { sender }, handle)
    }

    async fn submit(&self, tx: Transaction) -> Result<Receipt, DemoError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Request { tx, reply })
            .await
            .map_err(|_| DemoError::SequencerClosed)?;
        let receipt = response.await.map_err(|_| DemoError::SequencerClosed)??;
        Ok(receipt)
    }
}

async fn run_sequencer(mut game: GameController<MockLedger>, mut requests: mpsc::Receiver<Request>) {
    while let Some(Request { tx, reply }) = requests.recv().await {
        let result = game.apply(&tx);
        if let Err(e) = &result {
            warn!("Rejected transaction from {}: {}", tx.caller, e);
        }
        let _ = reply.send(result);
    }
    info!("Sequencer stopped (session {} in phase {})", game.session().id(), game.phase());
}

// ============================================================================
// Players
// ============================================================================

struct Player {
    name: &'static str,
    account: AccountId,
    choice: Move,
    reveals: bool,
}

async fn run_player(
    player: Player,
    wager: u64,
    sequencer: Sequencer,
    barrier: Arc<Barrier>,
) -> Result<Option<Settlement>, DemoError> {
    let receipt = sequencer
        .submit(Transaction::add_player(player.account, wager))
        .await?;
    if let Receipt::Joined(seat) = receipt {
        info!("{} joined as {}", player.name, seat);
    }
    barrier.wait().await;

    let disclosure = Disclosure::random(player.choice);
    sequencer
        .submit(Transaction::commit(player.account, disclosure.digest()))
        .await?;
    info!("{} committed {}", player.name, disclosure.digest());
    barrier.wait().await;

    if !player.reveals {
        info!("{} goes silent", player.name);
        return Ok(None);
    }

    let receipt = sequencer
        .submit(Transaction::reveal(player.account, &disclosure))
        .await?;
    info!("{} revealed {}", player.name, player.choice);
    Ok(receipt.settlement().cloned())
}

fn starting_balance(wager: u64) -> u64 {
    wager.saturating_mul(STARTING_WAGERS)
}

fn report(settlement: &Settlement, ledger: &MockLedger, players: &[(&str, AccountId)]) {
    info!(
        "Session {} settled: {:?}, pot {}",
        settlement.session_id, settlement.reason, settlement.pot
    );
    for (name, account) in players {
        info!(
            "  {} received {}, balance now {}",
            name,
            settlement.paid_to(account),
            ledger.balance_of(account)
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let demo = DemoConfig::from_env()?;
    let config = demo.game.clone();
    info!(
        "Demo config: {} moves, wager {}, windows {}s/{}s, stall {}",
        config.move_set,
        config.wager,
        config.commit_window_secs,
        config.reveal_window_secs,
        demo.stall
    );

    config.validate()?;
    let ledger = MockLedger::new();
    let alice = ledger.open_account(starting_balance(config.wager));
    let bob = ledger.open_account(starting_balance(config.wager));
    let game = GameController::new(config.clone(), ledger.clone())?;
    let (sequencer, sequencer_task) = Sequencer::spawn(game);

    let (choice_a, choice_b) = {
        let mut rng = rand::thread_rng();
        let moves = config.move_set.moves();
        (
            moves.choose(&mut rng).copied().unwrap_or(Move::Rock),
            moves.choose(&mut rng).copied().unwrap_or(Move::Rock),
        )
    };

    let barrier = Arc::new(Barrier::new(2));
    let player_a = tokio::spawn(run_player(
        Player {
            name: "Player A",
            account: alice,
            choice: choice_a,
            reveals: true,
        },
        config.wager,
        sequencer.clone(),
        barrier.clone(),
    ));
    let player_b = tokio::spawn(run_player(
        Player {
            name: "Player B",
            account: bob,
            choice: choice_b,
            reveals: !demo.stall,
        },
        config.wager,
        sequencer.clone(),
        barrier,
    ));

    let (a, b) = (player_a.await??, player_b.await??);
    let settlement = match a.or(b) {
        Some(settlement) => settlement,
        None => {
            let window = config.reveal_window().num_seconds();
            info!("No settlement yet; advancing the clock {}s past the reveal window", window);
            ledger.advance_time(window);

            match sequencer.submit(Transaction::withdraw(alice)).await? {
                Receipt::Withdrawn(settlement) => settlement,
                other => {
                    warn!("Unexpected receipt: {:?}", other);
                    return Ok(());
                }
            }
        }
    };

    report(&settlement, &ledger, &[("Player A", alice), ("Player B", bob)]);
    info!("Custody after settlement: {}", ledger.custody_balance());

    drop(sequencer);
    sequencer_task.await?;
    Ok(())
}
