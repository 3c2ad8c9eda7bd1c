//! WebSocket Game Server
//!
//! Accepts WebSocket connections, routes client messages to the shared game
//! service, drives the simulation clock, and pushes state snapshots to every
//! connected client.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::interval;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use crate::game::{ConfigError, EngineConfig};
use crate::network::protocol::{ClientMessage, ServerMessage};
use crate::network::session::{Command, GameService};
use crate::{SNAPSHOT_RATE, TICK_RATE};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Tick rate for the simulation clock (Hz).
    pub tick_rate: u32,
    /// Snapshot broadcast rate (Hz).
    pub snapshot_rate: u32,
    /// Display title sent to clients in the welcome message.
    pub game_title: String,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".parse().unwrap(),
            max_connections: 256,
            tick_rate: TICK_RATE,
            snapshot_rate: SNAPSHOT_RATE,
            game_title: "Temple Dash".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from defaults plus environment overrides.
    ///
    /// Recognized variables: `TEMPLE_DASH_BIND` (socket address),
    /// `TEMPLE_DASH_MAX_CONN` (connection limit), `TEMPLE_DASH_TITLE`
    /// (display title).
    pub fn from_env() -> Result<Self, GameServerError> {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var("TEMPLE_DASH_BIND") {
            config.bind_addr = bind.parse().map_err(|_| GameServerError::InvalidEnv {
                name: "TEMPLE_DASH_BIND",
                value: bind,
            })?;
        }

        if let Ok(max) = std::env::var("TEMPLE_DASH_MAX_CONN") {
            config.max_connections = max.parse().map_err(|_| GameServerError::InvalidEnv {
                name: "TEMPLE_DASH_MAX_CONN",
                value: max,
            })?;
        }

        if let Ok(title) = std::env::var("TEMPLE_DASH_TITLE") {
            config.game_title = title;
        }

        Ok(config)
    }
}

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An environment variable held an unusable value.
    #[error("Invalid {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Engine configuration failed validation.
    #[error("Engine configuration rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Connected client state.
struct ConnectedClient {
    /// Connection time, for disconnect logging.
    connected_at: Instant,
    /// Message channel to this client's writer task.
    sender: mpsc::Sender<ServerMessage>,
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// The shared game service.
    game: Arc<GameService>,
    /// Connected clients, keyed by peer address.
    clients: Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Create a new game server around a fresh engine.
    pub fn new(config: ServerConfig, game_config: EngineConfig) -> Result<Self, GameServerError> {
        let game = Arc::new(GameService::new(game_config)?);
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            game,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_tx,
        })
    }

    /// Run the server.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Game server listening on {}", self.config.bind_addr);

        // Spawn the simulation clock
        let drive_game = self.game.clone();
        let tick_rate = self.config.tick_rate;
        let drive_shutdown = self.shutdown_tx.subscribe();
        let drive_handle = tokio::spawn(async move {
            Self::run_drive_loop(drive_game, tick_rate, drive_shutdown).await;
        });

        // Spawn the snapshot broadcaster
        let broadcast_game = self.game.clone();
        let broadcast_clients = self.clients.clone();
        let snapshot_rate = self.config.snapshot_rate;
        let broadcast_shutdown = self.shutdown_tx.subscribe();
        let broadcast_handle = tokio::spawn(async move {
            Self::run_broadcast_loop(
                broadcast_game,
                broadcast_clients,
                snapshot_rate,
                broadcast_shutdown,
            )
            .await;
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let client_count = self.clients.read().await.len();
                            if client_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        // Wait for background tasks
        drive_handle.abort();
        broadcast_handle.abort();

        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let game = self.game.clone();
        let clients = self.clients.clone();
        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

            // Register client for snapshot broadcasts
            {
                let mut clients = clients.write().await;
                clients.insert(
                    addr,
                    ConnectedClient {
                        connected_at: Instant::now(),
                        sender: msg_tx.clone(),
                    },
                );
            }

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    let text = match msg.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            let welcome = ServerMessage::Welcome {
                server_version: config.version.clone(),
                tick_rate: config.tick_rate,
                game_title: config.game_title.clone(),
            };
            let _ = msg_tx.send(welcome).await;

            let mut game_over_rx = game.subscribe_game_over();

            // Handle incoming messages
            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                Self::handle_client_message(addr, &text, &game, &config, &msg_tx).await;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    game_over = game_over_rx.recv() => {
                        match game_over {
                            Ok(info) => {
                                let _ = msg_tx.send(ServerMessage::GameOver(info)).await;
                            }
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                debug!("Client {} missed {} game-over events", addr, skipped);
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = msg_tx.send(ServerMessage::Shutdown {
                            reason: "Server shutting down".to_string(),
                        }).await;
                        break;
                    }
                }
            }

            // Cleanup
            sender_task.abort();

            {
                let mut clients = clients.write().await;
                if let Some(client) = clients.remove(&addr) {
                    debug!(
                        "Client {} was connected for {:?}",
                        addr,
                        client.connected_at.elapsed()
                    );
                }
            }

            info!("Client {} cleaned up", addr);
        });
    }

    /// Handle a client frame.
    async fn handle_client_message(
        addr: SocketAddr,
        text: &str,
        game: &Arc<GameService>,
        config: &ServerConfig,
        sender: &mpsc::Sender<ServerMessage>,
    ) {
        let msg = match ClientMessage::from_json(text) {
            Ok(m) => m,
            Err(e) => {
                warn!("Invalid message from {}: {}", addr, e);
                let _ = sender
                    .send(ServerMessage::Error {
                        message: "Invalid message format".to_string(),
                    })
                    .await;
                return;
            }
        };

        // Simulation commands go through the service; illegal ones are
        // ignored there rather than answered with an error.
        if let Some(command) = Command::from_message(&msg) {
            debug!("Command {:?} from {}", command, addr);
            game.apply(command).await;
            return;
        }

        match msg {
            ClientMessage::GetState => {
                let data = game.snapshot().await;
                let _ = sender.send(ServerMessage::GameState { data }).await;
            }
            ClientMessage::GetStatus => {
                let _ = sender
                    .send(ServerMessage::Status {
                        status: "healthy".to_string(),
                        game_state: game.phase().await,
                        version: config.version.clone(),
                    })
                    .await;
            }
            ClientMessage::Ping { timestamp } => {
                let _ = sender
                    .send(ServerMessage::Pong {
                        timestamp,
                        server_time: unix_time_ms(),
                    })
                    .await;
            }
            // Commands were dispatched above.
            _ => {}
        }
    }

    /// Run the simulation clock.
    ///
    /// Ticks at `tick_rate` Hz and feeds the engine real elapsed time, so a
    /// stalled scheduler slows the game down instead of teleporting entities.
    async fn run_drive_loop(
        game: Arc<GameService>,
        tick_rate: u32,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let tick_duration = Duration::from_micros(1_000_000 / tick_rate as u64);
        let mut ticker = interval(tick_duration);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick).as_secs_f32();
                    last_tick = now;

                    let result = game.advance(dt).await;
                    if result.game_over {
                        let snapshot = game.snapshot().await;
                        info!(
                            "Run ended: score {} distance {} high score {}",
                            snapshot.score, snapshot.distance, snapshot.high_score
                        );
                    }
                }
                _ = shutdown_rx.recv() => break,
            }
        }
    }

    /// Push state snapshots to every connected client.
    async fn run_broadcast_loop(
        game: Arc<GameService>,
        clients: Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>,
        snapshot_rate: u32,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let frame_duration = Duration::from_micros(1_000_000 / snapshot_rate as u64);
        let mut ticker = interval(frame_duration);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let senders: Vec<mpsc::Sender<ServerMessage>> = {
                        let clients = clients.read().await;
                        clients.values().map(|c| c.sender.clone()).collect()
                    };

                    if senders.is_empty() {
                        continue;
                    }

                    let data = game.snapshot().await;
                    for sender in &senders {
                        // A saturated client drops frames rather than
                        // stalling the broadcaster.
                        let _ = sender.try_send(ServerMessage::GameState {
                            data: data.clone(),
                        });
                    }
                }
                _ = shutdown_rx.recv() => break,
            }
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

/// Milliseconds since the Unix epoch, for pong timestamps.
fn unix_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.snapshot_rate, 30);
        assert_eq!(config.max_connections, 256);
        assert_eq!(config.game_title, "Temple Dash");
    }

    #[test]
    fn test_server_config_from_env() {
        // One test covers all variables so parallel tests never race on the
        // process environment.
        std::env::set_var("TEMPLE_DASH_BIND", "not an address");
        assert!(matches!(
            ServerConfig::from_env(),
            Err(GameServerError::InvalidEnv { name: "TEMPLE_DASH_BIND", .. })
        ));

        std::env::set_var("TEMPLE_DASH_BIND", "127.0.0.1:9000");
        std::env::set_var("TEMPLE_DASH_MAX_CONN", "8");
        std::env::set_var("TEMPLE_DASH_TITLE", "Dash Test");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.game_title, "Dash Test");

        std::env::remove_var("TEMPLE_DASH_BIND");
        std::env::remove_var("TEMPLE_DASH_MAX_CONN");
        std::env::remove_var("TEMPLE_DASH_TITLE");
    }

    #[tokio::test]
    async fn test_server_creation() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        };
        let server = GameServer::new(config, EngineConfig::default()).unwrap();

        assert_eq!(server.connection_count().await, 0);
    }

    #[test]
    fn test_server_rejects_invalid_engine_config() {
        let game_config = EngineConfig {
            initial_speed: -1.0,
            ..EngineConfig::default()
        };
        let result = GameServer::new(ServerConfig::default(), game_config);
        assert!(matches!(result, Err(GameServerError::Config(_))));
    }

    #[tokio::test]
    async fn test_server_shutdown() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        };
        let server = GameServer::new(config, EngineConfig::default()).unwrap();
        server.shutdown();
        // Should not panic
    }
}
