//! # Temple Dash Game Server
//!
//! Endless-runner game simulation with a WebSocket service wrapped around it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   TEMPLE DASH SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Simulation engine (deterministic per seed)│
//! │  ├── config.rs   - Engine tunables and validation            │
//! │  ├── state.rs    - Session, player, obstacles, coins         │
//! │  ├── engine.rs   - Commands and the per-tick pipeline        │
//! │  ├── spawn.rs    - Obstacle/coin spawn trials and geometry   │
//! │  └── collision.rs- AABB overlap and avoidance rules          │
//! │                                                              │
//! │  network/        - Service glue (non-deterministic)          │
//! │  ├── server.rs   - WebSocket server, drive + broadcast loops │
//! │  ├── protocol.rs - Message types                             │
//! │  └── session.rs  - Shared engine access, command serialization│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The `game/` module is synchronous and free of I/O, clocks, and global
//! state. All randomness flows through an injected seeded PRNG, so two
//! engines built with [`Engine::with_seed`](game::Engine::with_seed) and fed
//! identical `dt` sequences produce identical snapshots. The network layer
//! supplies wall-clock deltas and is the only non-deterministic part.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod game;
pub mod network;

// Re-export commonly used types
pub use game::config::{ConfigError, EngineConfig};
pub use game::engine::{Engine, TickResult};
pub use game::state::{GamePhase, GameSession, ObstacleKind, PlayerAction, Snapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Snapshot broadcast rate (Hz), deliberately below the tick rate
pub const SNAPSHOT_RATE: u32 = 30;
