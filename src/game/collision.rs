//! Collision Detection
//!
//! AABB overlap plus the avoidance rule that decides whether an overlap
//! ends the run.

use crate::game::state::{Aabb, ObstacleKind, PlayerAction};

/// Check if two boxes overlap.
///
/// All four half-plane conditions are strict, so boxes that merely share
/// an edge or corner do not collide.
#[inline]
pub fn aabb_overlap(a: Aabb, b: Aabb) -> bool {
    a.x < b.x + b.width
        && a.x + a.width > b.x
        && a.y < b.y + b.height
        && a.y + a.height > b.y
}

/// Check whether the player's current action forgives an overlap with an
/// obstacle of the given kind.
///
/// High blocks are cleared while Jumping, Low bars while Sliding; Moving
/// obstacles have no evasion and always end the run on contact.
#[inline]
pub fn overlap_avoided(kind: ObstacleKind, action: PlayerAction) -> bool {
    matches!(
        (kind, action),
        (ObstacleKind::High, PlayerAction::Jumping)
            | (ObstacleKind::Low, PlayerAction::Sliding)
    )
}
