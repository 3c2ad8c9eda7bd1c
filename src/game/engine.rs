//! Simulation Engine
//!
//! Owns one session, the configuration it was built with, and the injected
//! PRNG, and exposes the command surface plus the per-tick update. The
//! engine is fully synchronous; an external driver decides when ticks
//! happen and with what `dt`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::game::collision::{aabb_overlap, overlap_avoided};
use crate::game::config::{ConfigError, EngineConfig};
use crate::game::spawn::{maybe_spawn_coin, maybe_spawn_obstacle};
use crate::game::state::{GamePhase, GameSession, PlayerAction, Snapshot};

/// What one call to [`Engine::advance`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickResult {
    /// The session was Playing when the tick began, so work was done
    pub advanced: bool,
    /// Coins collected during this tick
    pub coins_collected: u32,
    /// The run ended during this tick
    pub game_over: bool,
}

/// The endless-runner simulation.
///
/// All randomness flows through the PRNG injected at construction, so two
/// engines built via [`Engine::with_seed`] with equal seeds and fed equal
/// `dt` sequences and commands stay identical forever.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    session: GameSession,
    rng: Pcg32,
}

impl Engine {
    /// Build an engine with an entropy-seeded RNG.
    ///
    /// Fails if the configuration is invalid; a constructed engine never
    /// re-validates.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session: GameSession::new(config.initial_speed),
            rng: Pcg32::from_entropy(),
            config,
        })
    }

    /// Build an engine with a fixed seed for reproducible runs.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session: GameSession::new(config.initial_speed),
            rng: Pcg32::seed_from_u64(seed),
            config,
        })
    }

    /// Read access to the live session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Owned display view of the current session.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.session)
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Start a fresh run. Always legal from any phase; the high score
    /// carries over, everything else resets.
    pub fn start(&mut self) {
        self.session.restart(self.config.initial_speed);
    }

    /// Freeze an active run. No-op outside Playing.
    pub fn pause(&mut self) {
        if self.session.phase == GamePhase::Playing {
            self.session.phase = GamePhase::Paused;
        }
    }

    /// Resume a paused run. No-op outside Paused.
    pub fn resume(&mut self) {
        if self.session.phase == GamePhase::Paused {
            self.session.phase = GamePhase::Playing;
        }
    }

    /// Begin a jump. Honored only while Playing with the player Running;
    /// silently ignored otherwise, including mid-jump.
    pub fn jump(&mut self) {
        if self.session.is_playing() && self.session.player.action == PlayerAction::Running {
            self.session.player.action = PlayerAction::Jumping;
            self.session.player.action_timer = self.config.jump_duration;
        }
    }

    /// Begin a slide. Same contract as [`Engine::jump`].
    pub fn slide(&mut self) {
        if self.session.is_playing() && self.session.player.action == PlayerAction::Running {
            self.session.player.action = PlayerAction::Sliding;
            self.session.player.action_timer = self.config.slide_duration;
        }
    }

    // =========================================================================
    // TICK PIPELINE
    // =========================================================================

    /// Advance the simulation by `dt` seconds.
    ///
    /// A no-op unless the session is Playing. `dt` is expected to hover
    /// around 1/60 but any jitter works; motion scales by elapsed time
    /// while spawn trials and the distance score run once per call.
    ///
    /// Step order matters: later steps read what earlier ones wrote
    /// within the same tick.
    pub fn advance(&mut self, dt: f32) -> TickResult {
        let mut result = TickResult::default();

        if !self.session.is_playing() {
            return result;
        }
        result.advanced = true;

        // 1. Player action decay
        self.decay_player_action(dt);

        // 2. Obstacle spawn trial
        maybe_spawn_obstacle(&mut self.session, &self.config, &mut self.rng);

        // 3. Coin spawn trial
        maybe_spawn_coin(&mut self.session, &self.config, &mut self.rng);

        // 4. Obstacle motion and off-screen cleanup
        self.move_obstacles(dt);

        // 5. Coin motion and off-screen cleanup
        self.move_coins(dt);

        // 6. Collision resolution; a fatal hit ends the tick here
        self.resolve_collisions(&mut result);
        if result.game_over {
            return result;
        }

        // 7. Progression
        self.update_progression(dt);

        result
    }

    /// Step 1: wind down a jump or slide. The timer clamps to exactly
    /// zero when it crosses, restoring Running. Keyed on the action, not
    /// the timer, so a zero-length duration still clears on the next tick.
    fn decay_player_action(&mut self, dt: f32) {
        let player = &mut self.session.player;
        if player.action == PlayerAction::Running {
            return;
        }
        player.action_timer -= dt;
        if player.action_timer <= 0.0 {
            player.action = PlayerAction::Running;
            player.action_timer = 0.0;
        }
    }

    /// Step 4: obstacles scroll left at the speed frozen in at spawn.
    fn move_obstacles(&mut self, dt: f32) {
        for obstacle in &mut self.session.obstacles {
            obstacle.x -= obstacle.speed * 60.0 * dt;
        }
        self.session.obstacles.retain(|o| !o.off_screen());
    }

    /// Step 5: coins scroll at the session's current speed and spin for
    /// display.
    fn move_coins(&mut self, dt: f32) {
        let speed = self.session.speed;
        for coin in &mut self.session.coins {
            coin.x -= speed * 60.0 * dt;
            coin.spin_angle += 360.0 * dt;
        }
        self.session.coins.retain(|c| !c.off_screen());
    }

    /// Step 6: obstacles first, then coins. A fatal obstacle overlap ends
    /// the run immediately and skips the coin pass; avoided overlaps leave
    /// the obstacle in place.
    fn resolve_collisions(&mut self, result: &mut TickResult) {
        let player_box = self.session.player.bounds();
        let action = self.session.player.action;

        let fatal = self
            .session
            .obstacles
            .iter()
            .any(|o| aabb_overlap(player_box, o.bounds()) && !overlap_avoided(o.kind, action));
        if fatal {
            self.session.end_game();
            result.game_over = true;
            return;
        }

        let mut collected = 0u32;
        for coin in &mut self.session.coins {
            if coin.collected || !aabb_overlap(player_box, coin.bounds()) {
                continue;
            }
            coin.collected = true;
            collected += 1;
        }
        if collected > 0 {
            self.session.coins_collected += collected;
            self.session.score += collected * self.config.coin_score;
            result.coins_collected = collected;
        }
    }

    /// Step 7: time, derived distance, the flat per-tick score, and the
    /// linear speed ramp. The ramp only checks the ceiling before adding,
    /// so one oversized `dt` can overshoot `max_speed`; it never ratchets
    /// further once past.
    fn update_progression(&mut self, dt: f32) {
        let session = &mut self.session;
        session.game_time += dt;
        session.distance = (session.game_time * 10.0) as u32;
        session.score += self.config.distance_score;
        if session.speed < self.config.max_speed {
            session.speed += self.config.speed_increment * dt;
        }
    }
}
