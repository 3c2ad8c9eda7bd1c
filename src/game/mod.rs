//! Game Logic Module
//!
//! The whole simulation. Synchronous, no I/O, deterministic per seed.
//!
//! ## Module Structure
//!
//! - `config`: Engine tunables and construction-time validation
//! - `state`: Session, player, entities, snapshot views
//! - `engine`: Command surface and the per-tick pipeline
//! - `spawn`: Obstacle/coin spawn trials and geometry
//! - `collision`: AABB overlap and avoidance rules

pub mod config;
pub mod state;
pub mod engine;
pub mod spawn;
pub mod collision;

// Re-export key types
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, TickResult};
pub use state::{GamePhase, GameSession, ObstacleKind, Player, PlayerAction, Snapshot};
