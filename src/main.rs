//! Temple Dash Game Server
//!
//! Authoritative endless-runner simulation behind a WebSocket service.
//! Runs the server by default; `--demo` runs a headless scripted session
//! instead and verifies that equal seeds replay identically.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use temple_dash::{
    game::{Engine, EngineConfig},
    network::{GameServer, ServerConfig},
    SNAPSHOT_RATE, TICK_RATE, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Temple Dash Server v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);
    info!("Snapshot Rate: {} Hz", SNAPSHOT_RATE);

    if std::env::args().any(|arg| arg == "--demo") {
        return demo();
    }

    serve().await
}

/// Run the WebSocket service until interrupted.
async fn serve() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    let server = Arc::new(GameServer::new(config, EngineConfig::default())?);

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
            signal_server.shutdown();
        }
    });

    server.run().await?;
    Ok(())
}

/// Demo function to test the simulation.
fn demo() -> anyhow::Result<()> {
    info!("=== Starting Demo Run ===");

    let seed = 12345u64;
    const DEMO_TICKS: u32 = 3600;

    let mut engine = Engine::with_seed(EngineConfig::default(), seed)?;
    info!("RNG Seed: {}", seed);
    info!("Running {} ticks ({} seconds)...", DEMO_TICKS, DEMO_TICKS / TICK_RATE);

    let runs = run_scripted(&mut engine, DEMO_TICKS);
    let final_snapshot = engine.snapshot();

    info!("=== Demo Results ===");
    info!("Runs completed: {}", runs);
    info!("High score: {}", final_snapshot.high_score);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let mut replay = Engine::with_seed(EngineConfig::default(), seed)?;
    run_scripted(&mut replay, DEMO_TICKS);
    let replay_snapshot = replay.snapshot();

    if final_snapshot == replay_snapshot {
        info!("DETERMINISM VERIFIED: Snapshots match!");
    } else {
        info!("DETERMINISM FAILURE: Snapshots differ!");
    }

    Ok(())
}

/// Drive an engine through a fixed input script, restarting after each
/// game over. Returns the number of runs that ended.
fn run_scripted(engine: &mut Engine, ticks: u32) -> u32 {
    let mut runs_ended = 0;

    engine.start();
    for t in 0..ticks {
        // Synthetic reflexes: jump and slide on fixed cadences
        if t % 45 == 0 {
            engine.jump();
        }
        if t % 97 == 0 {
            engine.slide();
        }

        let result = engine.advance(1.0 / 60.0);
        if result.game_over {
            runs_ended += 1;
            let session = engine.session();
            info!(
                "Run {} ended at tick {}: score {} distance {} coins {}",
                runs_ended, t, session.score, session.distance, session.coins_collected
            );
            engine.start();
        }
    }

    runs_ended
}
