//! Engine Configuration
//!
//! All gameplay tunables, fixed at engine construction. Invalid values are
//! rejected when the engine is built; a running engine never re-validates.

use thiserror::Error;

/// Validation failure for an [`EngineConfig`] field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Field must be a finite number greater than zero.
    #[error("{0} must be a positive finite number")]
    NotPositive(&'static str),

    /// Field must be a finite number, zero or greater.
    #[error("{0} must be a finite non-negative number")]
    Negative(&'static str),

    /// Per-tick probability outside the unit interval.
    #[error("{0} must be within 0.0..=1.0")]
    RateOutOfRange(&'static str),

    /// Speed ramp ceiling below its starting point.
    #[error("max_speed must be at least initial_speed")]
    SpeedRangeInverted,

    /// Entity caps of zero would make spawning impossible.
    #[error("{0} must be nonzero")]
    ZeroCap(&'static str),
}

/// Gameplay tunables for one engine instance.
///
/// Speeds are in world units per 1/60 s reference frame; motion is scaled
/// by `speed * 60 * dt` so real elapsed time governs movement regardless of
/// tick rate. Spawn rates and `distance_score` are per tick, not per
/// second, so tick frequency is part of game balance.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Scroll speed at session start.
    pub initial_speed: f32,

    /// Ceiling for the linear speed ramp.
    pub max_speed: f32,

    /// Speed gained per second of play while below the ceiling.
    pub speed_increment: f32,

    /// Score awarded per collected coin.
    pub coin_score: u32,

    /// Score awarded every tick while playing.
    pub distance_score: u32,

    /// Seconds a jump keeps the player airborne.
    pub jump_duration: f32,

    /// Seconds a slide keeps the player low.
    pub slide_duration: f32,

    /// Chance per tick of spawning an obstacle.
    pub obstacle_spawn_rate: f32,

    /// Chance per tick of spawning a coin.
    pub coin_spawn_rate: f32,

    /// Cap on live obstacles; spawn trials skip while at the cap.
    pub max_obstacles: usize,

    /// Cap on live coins.
    pub max_coins: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_speed: 2.0,
            max_speed: 8.0,
            speed_increment: 0.1,
            coin_score: 10,
            distance_score: 1,
            jump_duration: 0.6,
            slide_duration: 0.4,
            obstacle_spawn_rate: 0.02,
            coin_spawn_rate: 0.015,
            max_obstacles: 32,
            max_coins: 32,
        }
    }
}

impl EngineConfig {
    /// Check every field; called by the engine constructors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(self.initial_speed, "initial_speed")?;
        require_positive(self.max_speed, "max_speed")?;
        if self.max_speed < self.initial_speed {
            return Err(ConfigError::SpeedRangeInverted);
        }
        require_non_negative(self.speed_increment, "speed_increment")?;
        require_non_negative(self.jump_duration, "jump_duration")?;
        require_non_negative(self.slide_duration, "slide_duration")?;
        require_rate(self.obstacle_spawn_rate, "obstacle_spawn_rate")?;
        require_rate(self.coin_spawn_rate, "coin_spawn_rate")?;
        if self.max_obstacles == 0 {
            return Err(ConfigError::ZeroCap("max_obstacles"));
        }
        if self.max_coins == 0 {
            return Err(ConfigError::ZeroCap("max_coins"));
        }
        Ok(())
    }
}

fn require_positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive(field));
    }
    Ok(())
}

fn require_non_negative(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Negative(field));
    }
    Ok(())
}

fn require_rate(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RateOutOfRange(field));
    }
    Ok(())
}
