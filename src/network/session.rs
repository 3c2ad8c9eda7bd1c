//! Game Service
//!
//! Owns the shared simulation engine and serializes access to it. The drive
//! loop, the snapshot broadcaster, and every client connection talk to the
//! same `GameService`; commands and ticks take the write half of one lock,
//! snapshots take the read half, so a tick is atomic and a snapshot is never
//! torn.

use tokio::sync::{broadcast, RwLock};

use crate::game::{ConfigError, Engine, EngineConfig, GamePhase, Snapshot, TickResult};
use crate::network::protocol::{ClientMessage, GameOverInfo};

/// Capacity of the game-over announcement channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A simulation command issued by a client.
///
/// Commands that do not apply in the current phase are ignored, matching the
/// engine's phase-gated command handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a new run (also restarts after game over).
    Start,
    /// Pause the current run.
    Pause,
    /// Resume a paused run.
    Resume,
    /// Jump over a high obstacle.
    Jump,
    /// Slide under a low obstacle.
    Slide,
}

impl Command {
    /// Map a wire message to a simulation command.
    ///
    /// Returns `None` for query messages (`get_state`, `get_status`, `ping`),
    /// which are answered by the connection handler without touching the
    /// engine's write lock.
    pub fn from_message(msg: &ClientMessage) -> Option<Self> {
        match msg {
            ClientMessage::Start => Some(Command::Start),
            ClientMessage::Pause => Some(Command::Pause),
            ClientMessage::Resume => Some(Command::Resume),
            ClientMessage::Jump => Some(Command::Jump),
            ClientMessage::Slide => Some(Command::Slide),
            ClientMessage::GetState | ClientMessage::GetStatus | ClientMessage::Ping { .. } => {
                None
            }
        }
    }
}

/// Shared access point to the one engine a server process runs.
pub struct GameService {
    /// The simulation. Private so every caller goes through the lock.
    engine: RwLock<Engine>,
    /// Game-over announcements for connected clients.
    game_over_tx: broadcast::Sender<GameOverInfo>,
}

impl GameService {
    /// Create a service around an entropy-seeded engine.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let engine = Engine::new(config)?;
        let (game_over_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            engine: RwLock::new(engine),
            game_over_tx,
        })
    }

    /// Create a service around a deterministically seeded engine.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        let engine = Engine::with_seed(config, seed)?;
        let (game_over_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            engine: RwLock::new(engine),
            game_over_tx,
        })
    }

    /// Apply a client command to the engine.
    pub async fn apply(&self, command: Command) {
        let mut engine = self.engine.write().await;
        match command {
            Command::Start => engine.start(),
            Command::Pause => engine.pause(),
            Command::Resume => engine.resume(),
            Command::Jump => engine.jump(),
            Command::Slide => engine.slide(),
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// If this tick ended the run, the final figures are broadcast to all
    /// game-over subscribers before the lock is released.
    pub async fn advance(&self, dt: f32) -> TickResult {
        let mut engine = self.engine.write().await;
        let result = engine.advance(dt);

        if result.game_over {
            let session = engine.session();
            let info = GameOverInfo {
                score: session.score,
                distance: session.distance,
                coins_collected: session.coins_collected,
                high_score: session.high_score,
            };
            // No receivers is fine: nobody is connected right now.
            let _ = self.game_over_tx.send(info);
        }

        result
    }

    /// Take a consistent snapshot of the current state.
    pub async fn snapshot(&self) -> Snapshot {
        let engine = self.engine.read().await;
        engine.snapshot()
    }

    /// Current phase, for health reporting.
    pub async fn phase(&self) -> GamePhase {
        let engine = self.engine.read().await;
        engine.session().phase
    }

    /// Subscribe to game-over announcements.
    pub fn subscribe_game_over(&self) -> broadcast::Receiver<GameOverInfo> {
        self.game_over_tx.subscribe()
    }
}
