//! Game State Definitions
//!
//! Session, player, and entity types for the endless-runner simulation,
//! plus the read-only snapshot views handed to the presentation side.
//! Coordinates are screen-space f32 in a nominal 800x400 world; the player
//! stays put horizontally while obstacles and coins scroll left past them.

use serde::{Deserialize, Serialize};

/// Right screen edge; entities spawn just past it and scroll left.
pub const SPAWN_X: f32 = 800.0;

// =============================================================================
// PHASES AND ACTIONS
// =============================================================================

/// Lifecycle phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No run in progress yet
    #[default]
    Menu,
    /// Active gameplay; the only phase in which ticks do work
    Playing,
    /// Frozen mid-run, resumable
    Paused,
    /// Run ended by collision; frozen until the next start
    GameOver,
}

/// What the player character is currently doing.
///
/// Jump and slide are timer-gated flags, not trajectories; the character's
/// position never changes, only which obstacle overlaps it can forgive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Default stride; vulnerable to every obstacle
    #[default]
    Running,
    /// Airborne; clears High obstacles
    Jumping,
    /// Ducked; clears Low obstacles
    Sliding,
}

// =============================================================================
// OBSTACLE KIND
// =============================================================================

/// Obstacle variant, which determines spawn geometry and how (or whether)
/// the player can avoid it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ObstacleKind {
    /// Ground-level block, jumped over
    High = 0,
    /// Overhanging bar, slid under
    Low = 1,
    /// Mid-height hazard with no evasion
    Moving = 2,
}

/// Spawn-time vertical placement and box height for an obstacle kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleGeometry {
    /// Vertical spawn position
    pub y: f32,
    /// Bounding-box height
    pub height: f32,
}

impl ObstacleKind {
    /// Geometry lookup by kind.
    pub fn geometry(self) -> ObstacleGeometry {
        match self {
            ObstacleKind::High => ObstacleGeometry { y: 320.0, height: 60.0 },
            ObstacleKind::Low => ObstacleGeometry { y: 280.0, height: 40.0 },
            ObstacleKind::Moving => ObstacleGeometry { y: 300.0, height: 50.0 },
        }
    }
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

/// Axis-aligned bounding box in screen space (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
}

impl Aabb {
    /// Create a box from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// The auto-running player character.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Horizontal position (fixed; the world scrolls, not the player)
    pub x: f32,

    /// Vertical position
    pub y: f32,

    /// Bounding-box width
    pub width: f32,

    /// Bounding-box height
    pub height: f32,

    /// Current action
    pub action: PlayerAction,

    /// Seconds remaining in the current non-Running action.
    /// Invariant: zero exactly when `action` is Running.
    pub action_timer: f32,
}

impl Player {
    /// Starting horizontal position.
    pub const START_X: f32 = 100.0;

    /// Starting vertical position.
    pub const START_Y: f32 = 300.0;

    /// Bounding-box width.
    pub const WIDTH: f32 = 40.0;

    /// Bounding-box height.
    pub const HEIGHT: f32 = 60.0;

    /// Create a player at the starting position, running.
    pub fn new() -> Self {
        Self {
            x: Self::START_X,
            y: Self::START_Y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            action: PlayerAction::Running,
            action_timer: 0.0,
        }
    }

    /// Collision box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// OBSTACLE
// =============================================================================

/// A hazard scrolling toward the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// Bounding-box width
    pub width: f32,

    /// Bounding-box height
    pub height: f32,

    /// Variant, fixed at spawn
    pub kind: ObstacleKind,

    /// Scroll speed copied from the session at spawn time; obstacles do
    /// not accelerate after spawning.
    pub speed: f32,
}

impl Obstacle {
    /// Bounding-box width, same for every kind.
    pub const WIDTH: f32 = 40.0;

    /// Spawn an obstacle of the given kind at the right edge.
    pub fn new(kind: ObstacleKind, speed: f32) -> Self {
        let geometry = kind.geometry();
        Self {
            x: SPAWN_X,
            y: geometry.y,
            width: Self::WIDTH,
            height: geometry.height,
            kind,
            speed,
        }
    }

    /// Collision box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Fully past the left screen boundary.
    #[inline]
    pub fn off_screen(&self) -> bool {
        self.x < -self.width
    }
}

// =============================================================================
// COIN
// =============================================================================

/// A collectible coin in one of the fixed lanes.
#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// Bounding-box width
    pub width: f32,

    /// Bounding-box height
    pub height: f32,

    /// Set on pickup; collected coins keep scrolling but score only once
    pub collected: bool,

    /// Cosmetic rotation in degrees, no gameplay meaning
    pub spin_angle: f32,
}

impl Coin {
    /// Coins are square.
    pub const SIZE: f32 = 20.0;

    /// Spawn a coin at the right edge in the given lane.
    pub fn new(lane_y: f32) -> Self {
        Self {
            x: SPAWN_X,
            y: lane_y,
            width: Self::SIZE,
            height: Self::SIZE,
            collected: false,
            spin_angle: 0.0,
        }
    }

    /// Collision box.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Fully past the left screen boundary.
    #[inline]
    pub fn off_screen(&self) -> bool {
        self.x < -self.width
    }
}

// =============================================================================
// GAME SESSION
// =============================================================================

/// Complete state of one play-through.
///
/// Created fresh on every start (the high score survives), mutated each
/// tick while Playing, and frozen once the phase leaves Playing.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    /// Current lifecycle phase
    pub phase: GamePhase,

    /// Accumulated score (distance ticks + coins)
    pub score: u32,

    /// Distance travelled, derived from `game_time`
    pub distance: u32,

    /// Coins collected this run
    pub coins_collected: u32,

    /// Current scroll speed (world units per 1/60 s frame)
    pub speed: f32,

    /// Best score across runs; never decreases
    pub high_score: u32,

    /// Seconds of active play this run
    pub game_time: f32,

    /// The player character
    pub player: Player,

    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,

    /// Live coins in spawn order
    pub coins: Vec<Coin>,
}

impl GameSession {
    /// Create an idle session sitting at the menu.
    pub fn new(initial_speed: f32) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            distance: 0,
            coins_collected: 0,
            speed: initial_speed,
            high_score: 0,
            game_time: 0.0,
            player: Player::new(),
            obstacles: Vec::new(),
            coins: Vec::new(),
        }
    }

    /// Reset to a fresh Playing run, carrying the high score forward.
    pub fn restart(&mut self, initial_speed: f32) {
        let high_score = self.high_score;
        *self = Self::new(initial_speed);
        self.high_score = high_score;
        self.phase = GamePhase::Playing;
    }

    /// End the run: freeze the session and fold the score into the
    /// high score.
    pub fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.high_score = self.high_score.max(self.score);
    }

    /// Whether ticks currently do work.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Whether the last run has ended.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

// =============================================================================
// SNAPSHOT VIEWS
// =============================================================================

/// Player fields exposed to the presentation side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
    /// Current action
    pub action: PlayerAction,
}

/// Obstacle fields exposed to the presentation side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
    /// Obstacle variant
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

/// Coin fields exposed to the presentation side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinView {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Rotation in degrees
    pub spin: f32,
    /// Already picked up
    pub collected: bool,
}

/// Immutable view of a session for rendering.
///
/// Owns copies of everything; it never aliases the live entity vectors, so
/// a snapshot taken mid-session stays valid while the session keeps
/// mutating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Session phase
    pub state: GamePhase,
    /// Accumulated score
    pub score: u32,
    /// Distance travelled
    pub distance: u32,
    /// Coins collected this run
    pub coins_collected: u32,
    /// Best score across runs
    pub high_score: u32,
    /// Scroll speed, rounded to one decimal for display
    pub speed: f32,
    /// Player position and action
    pub player: PlayerView,
    /// Live obstacles
    pub obstacles: Vec<ObstacleView>,
    /// Live coins
    pub coins: Vec<CoinView>,
}

impl Snapshot {
    /// Capture a session into an owned view.
    pub fn capture(session: &GameSession) -> Self {
        Self {
            state: session.phase,
            score: session.score,
            distance: session.distance,
            coins_collected: session.coins_collected,
            high_score: session.high_score,
            speed: display_speed(session.speed),
            player: PlayerView {
                x: session.player.x,
                y: session.player.y,
                action: session.player.action,
            },
            obstacles: session
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    y: o.y,
                    width: o.width,
                    height: o.height,
                    kind: o.kind,
                })
                .collect(),
            coins: session
                .coins
                .iter()
                .map(|c| CoinView {
                    x: c.x,
                    y: c.y,
                    spin: c.spin_angle,
                    collected: c.collected,
                })
                .collect(),
        }
    }
}

/// Round speed to one decimal for display.
fn display_speed(speed: f32) -> f32 {
    (speed * 10.0).round() / 10.0
}

// =============================================================================
// TESTS
// =============================================================================
