//! Obstacle and Coin Spawning
//!
//! Per-tick Bernoulli spawn trials. Rates are per tick, not per second, so
//! tick frequency is part of game balance; both trials draw from the
//! engine's injected RNG, keeping equal-seed sessions identical.

use rand::Rng;

use crate::game::config::EngineConfig;
use crate::game::state::{Coin, GameSession, Obstacle, ObstacleKind};

/// Coin lane heights, top to bottom.
pub const COIN_LANES: [f32; 3] = [250.0, 280.0, 310.0];

/// Obstacle kinds eligible for the uniform spawn pick.
pub const OBSTACLE_KINDS: [ObstacleKind; 3] = [
    ObstacleKind::High,
    ObstacleKind::Low,
    ObstacleKind::Moving,
];

/// Run one obstacle spawn trial.
///
/// On success the obstacle spawns at the right edge with a uniformly
/// chosen kind, kind-specific geometry, and the session's current speed
/// frozen in.
pub fn maybe_spawn_obstacle(
    session: &mut GameSession,
    config: &EngineConfig,
    rng: &mut impl Rng,
) {
    if !session.is_playing() {
        return;
    }
    if session.obstacles.len() >= config.max_obstacles {
        return;
    }
    if rng.gen::<f32>() >= config.obstacle_spawn_rate {
        return;
    }

    let kind = OBSTACLE_KINDS[rng.gen_range(0..OBSTACLE_KINDS.len())];
    session.obstacles.push(Obstacle::new(kind, session.speed));
}

/// Run one coin spawn trial, independent of the obstacle trial.
pub fn maybe_spawn_coin(session: &mut GameSession, config: &EngineConfig, rng: &mut impl Rng) {
    if !session.is_playing() {
        return;
    }
    if session.coins.len() >= config.max_coins {
        return;
    }
    if rng.gen::<f32>() >= config.coin_spawn_rate {
        return;
    }

    let lane_y = COIN_LANES[rng.gen_range(0..COIN_LANES.len())];
    session.coins.push(Coin::new(lane_y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{GamePhase, SPAWN_X};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_session() -> GameSession {
        let mut session = GameSession::new(2.0);
        session.phase = GamePhase::Playing;
        session
    }

    fn always_spawn() -> EngineConfig {
        EngineConfig {
            obstacle_spawn_rate: 1.0,
            coin_spawn_rate: 1.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_spawn_determinism() {
        let config = EngineConfig::default();
        let mut session1 = playing_session();
        let mut session2 = playing_session();
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(12345);

        for _ in 0..500 {
            maybe_spawn_obstacle(&mut session1, &config, &mut rng1);
            maybe_spawn_coin(&mut session1, &config, &mut rng1);
            maybe_spawn_obstacle(&mut session2, &config, &mut rng2);
            maybe_spawn_coin(&mut session2, &config, &mut rng2);
        }

        assert_eq!(session1.obstacles, session2.obstacles);
        assert_eq!(session1.coins, session2.coins);
    }

    #[test]
    fn test_spawned_obstacle_freezes_session_speed() {
        let config = always_spawn();
        let mut session = playing_session();
        session.speed = 5.5;
        let mut rng = Pcg32::seed_from_u64(7);

        maybe_spawn_obstacle(&mut session, &config, &mut rng);
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.obstacles[0].speed, 5.5);

        // The session speeding up later does not touch the spawned obstacle.
        session.speed = 7.0;
        assert_eq!(session.obstacles[0].speed, 5.5);
    }

    #[test]
    fn test_spawn_respects_caps() {
        let config = EngineConfig {
            max_obstacles: 4,
            max_coins: 2,
            ..always_spawn()
        };
        let mut session = playing_session();
        let mut rng = Pcg32::seed_from_u64(99);

        for _ in 0..10 {
            maybe_spawn_obstacle(&mut session, &config, &mut rng);
            maybe_spawn_coin(&mut session, &config, &mut rng);
        }

        assert_eq!(session.obstacles.len(), 4);
        assert_eq!(session.coins.len(), 2);
    }

    #[test]
    fn test_no_spawns_outside_playing() {
        let config = always_spawn();
        let mut session = GameSession::new(2.0);
        let mut rng = Pcg32::seed_from_u64(1);

        maybe_spawn_obstacle(&mut session, &config, &mut rng);
        maybe_spawn_coin(&mut session, &config, &mut rng);
        assert!(session.obstacles.is_empty());
        assert!(session.coins.is_empty());

        session.phase = GamePhase::Paused;
        maybe_spawn_obstacle(&mut session, &config, &mut rng);
        assert!(session.obstacles.is_empty());
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let config = EngineConfig {
            obstacle_spawn_rate: 0.0,
            coin_spawn_rate: 0.0,
            ..EngineConfig::default()
        };
        let mut session = playing_session();
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..200 {
            maybe_spawn_obstacle(&mut session, &config, &mut rng);
            maybe_spawn_coin(&mut session, &config, &mut rng);
        }

        assert!(session.obstacles.is_empty());
        assert!(session.coins.is_empty());
    }

    #[test]
    fn test_coins_stay_in_lanes() {
        let config = EngineConfig {
            max_coins: 64,
            ..always_spawn()
        };
        let mut session = playing_session();
        let mut rng = Pcg32::seed_from_u64(3);

        for _ in 0..50 {
            maybe_spawn_coin(&mut session, &config, &mut rng);
        }

        assert_eq!(session.coins.len(), 50);
        for coin in &session.coins {
            assert_eq!(coin.x, SPAWN_X);
            assert!(COIN_LANES.contains(&coin.y), "off-lane coin at y={}", coin.y);
        }
    }

    #[test]
    fn test_every_kind_spawns_under_forced_rate() {
        let config = EngineConfig {
            max_obstacles: 128,
            ..always_spawn()
        };
        let mut session = playing_session();
        let mut rng = Pcg32::seed_from_u64(5);

        for _ in 0..100 {
            maybe_spawn_obstacle(&mut session, &config, &mut rng);
        }

        for kind in OBSTACLE_KINDS {
            assert!(
                session.obstacles.iter().any(|o| o.kind == kind),
                "no {:?} obstacle in 100 forced spawns",
                kind
            );
        }
    }
}
