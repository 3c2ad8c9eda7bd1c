//! Network Layer
//!
//! WebSocket service around the simulation. This layer is **non-deterministic**
//! (wall-clock ticks, socket timing) - all game logic runs through `game/`.

pub mod protocol;
pub mod server;
pub mod session;

pub use protocol::{ClientMessage, GameOverInfo, ServerMessage};
pub use server::{GameServer, GameServerError, ServerConfig};
pub use session::{Command, GameService};
