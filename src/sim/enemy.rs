//! Enemy ship chase heuristic
//!
//! The ship backs off when too far ahead of the character and rushes in when
//! too far behind. Between the two thresholds it keeps whatever velocity it
//! had, so it sweeps back and forth over the character instead of settling.

use rand::Rng;

use super::state::Enemy;
use crate::consts::{ENEMY_BACKOFF_VX, ENEMY_CATCHUP_VX, ENEMY_JITTER_MAX, ENEMY_JITTER_MIN};
use crate::world::Viewport;

/// Advance the ship one tick toward the character at `world_x`
pub fn chase<R: Rng>(enemy: &mut Enemy, world_x: f32, viewport: &Viewport, rng: &mut R) {
    if enemy.friendly {
        enemy.vel = glam::Vec2::ZERO;
        return;
    }

    if enemy.pos.x > world_x + viewport.enemy_lead() {
        enemy.vel.x = ENEMY_BACKOFF_VX;
    } else if enemy.pos.x < world_x - viewport.enemy_trail() {
        enemy.vel.x = ENEMY_CATCHUP_VX;
    }

    // Unbounded random walk on vy; only the position is clamped
    enemy.vel.y += rng.random_range(ENEMY_JITTER_MIN..ENEMY_JITTER_MAX);

    let (top, bottom) = viewport.enemy_band();
    enemy.pos.x += enemy.vel.x;
    enemy.pos.y = (enemy.pos.y + enemy.vel.y).clamp(top, bottom);
}
