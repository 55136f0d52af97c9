//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (layout order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod lava;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use lava::LavaDot;
pub use snapshot::Snapshot;
pub use state::{
    Canyon, Character, Cloud, Collectable, Enemy, Flagpole, GamePhase, GameState, PhysicsParams,
    Platform, Pose,
};
pub use tick::{GameEvent, TickInput, tick};
