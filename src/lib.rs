//! Hat Runner - a side-scrolling canyon platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `world`: Static world layout and viewport scaling
//! - `renderer`: Draw-list generation and the canvas backend
//! - `settings`: Player preferences
//! - `error`: Configuration errors

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod world;

pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};
pub use world::{Viewport, WorldLayout};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the game was tuned at 60 frames per second)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Lives at the start of a playthrough
    pub const START_LIVES: u8 = 3;
    /// Score at the start of every life
    pub const START_SCORE: i64 = 50;
    /// Score for picking up a collectable
    pub const COLLECTABLE_SCORE: i64 = 100;
    /// Score for reaching the flagpole
    pub const FLAGPOLE_SCORE: i64 = 500;
    /// Score lost per tick while the enemy ship hovers over the character
    pub const ENEMY_DRAIN: i64 = 2;

    /// Pickup distance from the character's upper body to a collectable centre
    pub const COLLECT_RADIUS: f32 = 40.0;
    /// Horizontal distance at which the flagpole counts as reached
    pub const FLAGPOLE_RADIUS: f32 = 10.0;
    /// Horizontal distance at which the enemy beam hits the character
    pub const ENEMY_RANGE: f32 = 30.0;

    /// World scroll per tick when pushing against the left edge of the band
    pub const LEFT_SCROLL_RATE: f32 = 5.0;
    /// Character may walk freely between these fractions of the screen width
    pub const WALK_BAND_MIN: f32 = 0.2;
    pub const WALK_BAND_MAX: f32 = 0.8;
    /// Character spawn x as a fraction of the screen width
    pub const SPAWN_X_FRACTION: f32 = 0.1;
    /// Horizontal velocity cap, as a multiple of the base velocity
    pub const MAX_VELOCITY_MULTIPLIER: f32 = 4.0;
    /// Delay between releasing a direction key and the velocity reset (300 ms)
    pub const VELOCITY_RESET_TICKS: u64 = 18;
    /// Tolerance for "standing on the floor"
    pub const GROUND_EPSILON: f32 = 0.01;

    /// Enemy ship horizontal speeds
    pub const ENEMY_BACKOFF_VX: f32 = -3.0;
    pub const ENEMY_CATCHUP_VX: f32 = 7.0;
    /// Enemy ship vertical random-walk step range
    pub const ENEMY_JITTER_MIN: f32 = -0.04;
    pub const ENEMY_JITTER_MAX: f32 = 0.0405;

    /// Cloud drift per tick and relative altitude jitter
    pub const CLOUD_DRIFT: f32 = 0.05;
    pub const CLOUD_JITTER: f32 = 0.002;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    glam::Vec2::new(ax, ay).distance(glam::Vec2::new(bx, by))
}
