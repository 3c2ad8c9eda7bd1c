//! WebSocket Protocol Messages
//!
//! Defines all client-server messages for the game service. Every frame is a
//! JSON object with an external `type` tag so browser clients can dispatch on
//! a single field without peeking at the payload.

use serde::{Deserialize, Serialize};

use crate::game::{GamePhase, Snapshot};

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start a new run (also restarts after game over).
    Start,

    /// Pause the current run.
    Pause,

    /// Resume a paused run.
    Resume,

    /// Make the player jump.
    Jump,

    /// Make the player slide.
    Slide,

    /// Request an immediate state snapshot.
    GetState,

    /// Request server health and phase.
    GetStatus,

    /// Ping for latency measurement.
    Ping {
        /// Client timestamp (ms, client clock).
        timestamp: u64,
    },
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the WebSocket handshake.
    Welcome {
        /// Server crate version.
        server_version: String,
        /// Simulation tick rate (Hz).
        tick_rate: u32,
        /// Display title for the client UI.
        game_title: String,
    },

    /// Full game state snapshot (pushed on a timer and on `get_state`).
    GameState {
        /// Snapshot payload in the wire shape clients render from.
        data: Snapshot,
    },

    /// The run just ended.
    GameOver(GameOverInfo),

    /// Health response for `get_status`.
    Status {
        /// Liveness string, `"healthy"` while the service runs.
        status: String,
        /// Current engine phase.
        game_state: GamePhase,
        /// Server crate version.
        version: String,
    },

    /// Ping response for latency measurement.
    Pong {
        /// Echoed client timestamp.
        timestamp: u64,
        /// Server timestamp (ms since epoch).
        server_time: u64,
    },

    /// The server is shutting down.
    Shutdown {
        /// Reason for shutdown.
        reason: String,
    },

    /// A client frame could not be understood.
    Error {
        /// Human-readable description.
        message: String,
    },
}

/// Final figures for a run, carried by [`ServerMessage::GameOver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverInfo {
    /// Final score.
    pub score: u32,
    /// Distance travelled.
    pub distance: u32,
    /// Coins collected during the run.
    pub coins_collected: u32,
    /// High score after folding in this run.
    pub high_score: u32,
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Engine, EngineConfig};

    #[test]
    fn test_client_message_roundtrip() {
        let messages = vec![
            ClientMessage::Start,
            ClientMessage::Pause,
            ClientMessage::Resume,
            ClientMessage::Jump,
            ClientMessage::Slide,
            ClientMessage::GetState,
            ClientMessage::GetStatus,
            ClientMessage::Ping { timestamp: 123_456 },
        ];

        for msg in messages {
            let json = msg.to_json().unwrap();
            let decoded = ClientMessage::from_json(&json).unwrap();
            assert_eq!(
                format!("{:?}", msg),
                format!("{:?}", decoded),
                "roundtrip mismatch for {}",
                json
            );
        }
    }

    #[test]
    fn test_client_message_tags() {
        let json = ClientMessage::GetState.to_json().unwrap();
        assert!(json.contains("\"type\":\"get_state\""));

        let json = ClientMessage::Jump.to_json().unwrap();
        assert!(json.contains("\"type\":\"jump\""));

        let json = ClientMessage::Ping { timestamp: 7 }.to_json().unwrap();
        assert!(json.contains("\"type\":\"ping\""));
        assert!(json.contains("\"timestamp\":7"));
    }

    #[test]
    fn test_client_message_from_plain_json() {
        // Hand-written frames, as a browser client would send them.
        let msg = ClientMessage::from_json(r#"{"type":"start"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Start));

        let msg = ClientMessage::from_json(r#"{"type":"slide"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Slide));

        let msg = ClientMessage::from_json(r#"{"type":"ping","timestamp":99}"#).unwrap();
        if let ClientMessage::Ping { timestamp } = msg {
            assert_eq!(timestamp, 99);
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_malformed_client_message_rejected() {
        assert!(ClientMessage::from_json("not json").is_err());
        assert!(ClientMessage::from_json(r#"{"type":"warp"}"#).is_err());
        assert!(ClientMessage::from_json(r#"{"timestamp":1}"#).is_err());
    }

    #[test]
    fn test_welcome_roundtrip() {
        let msg = ServerMessage::Welcome {
            server_version: "0.1.0".to_string(),
            tick_rate: 60,
            game_title: "Temple Dash".to_string(),
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"welcome\""));
        assert!(json.contains("\"tick_rate\":60"));

        let decoded = ServerMessage::from_json(&json).unwrap();
        if let ServerMessage::Welcome {
            server_version,
            tick_rate,
            game_title,
        } = decoded
        {
            assert_eq!(server_version, "0.1.0");
            assert_eq!(tick_rate, 60);
            assert_eq!(game_title, "Temple Dash");
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_game_state_carries_snapshot_wire_shape() {
        let engine = Engine::with_seed(EngineConfig::default(), 11).unwrap();
        let msg = ServerMessage::GameState {
            data: engine.snapshot(),
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"game_state\""));
        // Snapshot fields keep their camelCase wire names inside the envelope.
        assert!(json.contains("\"coinsCollected\""));
        assert!(json.contains("\"highScore\""));

        let decoded = ServerMessage::from_json(&json).unwrap();
        if let ServerMessage::GameState { data } = decoded {
            assert_eq!(data.state, GamePhase::Menu);
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_game_over_roundtrip() {
        let msg = ServerMessage::GameOver(GameOverInfo {
            score: 420,
            distance: 310,
            coins_collected: 11,
            high_score: 500,
        });

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"game_over\""));
        assert!(json.contains("\"coins_collected\":11"));

        let decoded = ServerMessage::from_json(&json).unwrap();
        if let ServerMessage::GameOver(info) = decoded {
            assert_eq!(info.score, 420);
            assert_eq!(info.high_score, 500);
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_status_phase_uses_snake_case() {
        let msg = ServerMessage::Status {
            status: "healthy".to_string(),
            game_state: GamePhase::GameOver,
            version: "0.1.0".to_string(),
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"status\""));
        assert!(json.contains("\"game_state\":\"game_over\""));
    }

    #[test]
    fn test_pong_roundtrip() {
        let msg = ServerMessage::Pong {
            timestamp: 41,
            server_time: 1_700_000_000_000,
        };

        let json = msg.to_json().unwrap();
        let decoded = ServerMessage::from_json(&json).unwrap();
        if let ServerMessage::Pong {
            timestamp,
            server_time,
        } = decoded
        {
            assert_eq!(timestamp, 41);
            assert_eq!(server_time, 1_700_000_000_000);
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_error_message() {
        let msg = ServerMessage::Error {
            message: "unknown message type".to_string(),
        };

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("unknown message type"));
    }
}
