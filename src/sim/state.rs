//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`. The static layout is
//! kept alongside so a respawn can rebuild entity state from it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision;
use super::lava::LavaDot;
use crate::consts::*;
use crate::error::ConfigResult;
use crate::world::{Viewport, WorldLayout};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Character is alive and the world updates
    Playing,
    /// Flagpole reached; scene frozen
    Won,
    /// Lives exhausted; only a fresh game leaves this phase
    GameOver,
}

/// How the character should be drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Standing,
    WalkLeft,
    WalkRight,
    JumpLeft,
    JumpRight,
    /// Airborne or plummeting with no direction held
    JumpFront,
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Position on screen; kept inside the walk band by scrolling the world
    pub screen_x: f32,
    pub y: f32,
    /// True horizontal position in the world (screen_x - scroll)
    pub world_x: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub falling: bool,
    /// Over a canyon: horizontal control is gone until the death check fires
    pub plummeting: bool,
    /// Standing on the floor or a platform; the only state that allows a jump
    pub grounded: bool,
}

impl Character {
    pub fn spawn(viewport: &Viewport) -> Self {
        let screen_x = viewport.spawn_x();
        Self {
            screen_x,
            y: viewport.floor_y(),
            world_x: screen_x,
            moving_left: false,
            moving_right: false,
            falling: false,
            plummeting: false,
            grounded: true,
        }
    }

    /// Pose for the presentation layer. The character stands still once the
    /// flagpole is reached.
    pub fn pose(&self, flag_reached: bool) -> Pose {
        if flag_reached {
            return Pose::Standing;
        }
        let airborne = self.falling || self.plummeting;
        match (self.moving_left, self.moving_right, airborne) {
            (true, _, true) => Pose::JumpLeft,
            (false, true, true) => Pose::JumpRight,
            (true, _, false) => Pose::WalkLeft,
            (false, true, false) => Pose::WalkRight,
            (false, false, true) => Pose::JumpFront,
            (false, false, false) => Pose::Standing,
        }
    }
}

/// Character movement tuning for the current life
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsParams {
    /// Horizontal speed; grows while a direction is held
    pub x_vel: f32,
    /// Added to `x_vel` every tick a direction is held
    pub x_acceleration: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Value `x_vel` returns to after a key release
    pub base_x_vel: f32,
    pub max_x_vel: f32,
}

impl PhysicsParams {
    pub fn new(viewport: &Viewport) -> Self {
        let base_x_vel = viewport.base_x_vel();
        Self {
            x_vel: base_x_vel,
            x_acceleration: viewport.x_acceleration(),
            gravity: viewport.gravity(),
            jump_impulse: viewport.jump_impulse(),
            base_x_vel,
            max_x_vel: base_x_vel * MAX_VELOCITY_MULTIPLIER,
        }
    }

    pub fn accelerate(&mut self) {
        self.x_vel = (self.x_vel + self.x_acceleration).min(self.max_x_vel);
    }

    pub fn reset_velocity(&mut self) {
        self.x_vel = self.base_x_vel;
    }

    /// Enemy beam slows the character down for the rest of the life
    pub fn apply_range_penalty(&mut self, penalty: f32) {
        self.x_acceleration = (self.x_acceleration - penalty).max(0.0);
    }
}

/// Deferred velocity reset after a direction key is released.
///
/// Holds at most one pending deadline; scheduling replaces it and any new
/// key press cancels it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetTimer {
    due_tick: Option<u64>,
}

impl ResetTimer {
    pub fn schedule(&mut self, now: u64) {
        self.due_tick = Some(now + VELOCITY_RESET_TICKS);
    }

    pub fn cancel(&mut self) {
        self.due_tick = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_tick.is_some()
    }

    /// Returns true exactly once, on the first tick at or after the deadline
    pub fn fire(&mut self, now: u64) -> bool {
        match self.due_tick {
            Some(due) if now >= due => {
                self.due_tick = None;
                true
            }
            _ => false,
        }
    }
}

/// Direction keys held as of the previous tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left_held: bool,
    pub right_held: bool,
}

/// A floating platform. `y` is the top surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub length: f32,
}

impl Platform {
    /// Is a character at (world_x, char_y) standing on this platform?
    pub fn contact(&self, world_x: f32, char_y: f32, viewport: &Viewport) -> bool {
        collision::platform_contact(
            self,
            world_x,
            char_y,
            viewport.platform_margin(),
            viewport.platform_band(),
        )
    }
}

/// A pit in the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canyon {
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectable {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// One-shot: never reverts within a life
    pub found: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flagpole {
    pub x: f32,
    /// One-shot and terminal
    pub reached: bool,
}

/// The chasing ship
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub in_range: bool,
    /// Set permanently once the flagpole is reached; freezes the ship
    pub friendly: bool,
}

impl Enemy {
    pub fn spawn(x: f32, viewport: &Viewport) -> Self {
        Self {
            pos: Vec2::new(x, viewport.enemy_start_y()),
            vel: Vec2::new(ENEMY_BACKOFF_VX, 0.0),
            in_range: false,
            friendly: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
}

/// Default cap on live lava dots
pub const DEFAULT_MAX_LAVA_DOTS: usize = 600;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub viewport: Viewport,
    pub layout: WorldLayout,
    pub(crate) rng: Pcg32,
    /// Survives respawns; everything else is rebuilt by `start_game`
    pub lives: u8,
    pub score: i64,
    pub phase: GamePhase,
    /// Paused games do not tick. A new game starts paused.
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Horizontal world offset; positive when the world has moved right
    pub scroll: f32,
    pub character: Character,
    pub physics: PhysicsParams,
    pub platforms: Vec<Platform>,
    pub canyons: Vec<Canyon>,
    pub collectables: Vec<Collectable>,
    pub flagpole: Flagpole,
    pub enemy: Enemy,
    pub clouds: Vec<Cloud>,
    pub lava: Vec<LavaDot>,
    pub max_lava_dots: usize,
    pub controls: Controls,
    pub velocity_reset: ResetTimer,
}

impl GameState {
    /// Build a game from a layout, rejecting layouts that don't fit the viewport
    pub fn new(seed: u64, viewport: Viewport, layout: WorldLayout) -> ConfigResult<Self> {
        layout.validate(&viewport)?;

        let floor = viewport.floor_y();
        let platforms = layout
            .platforms
            .iter()
            .map(|p| Platform {
                x: p.x,
                y: floor - p.elevation,
                length: p.length,
            })
            .collect();
        let canyons = layout
            .canyons
            .iter()
            .map(|c| Canyon {
                x: c.x,
                width: c.width,
            })
            .collect();

        let mut state = Self {
            seed,
            viewport,
            character: Character::spawn(&viewport),
            physics: PhysicsParams::new(&viewport),
            enemy: Enemy::spawn(layout.enemy_start_x, &viewport),
            flagpole: Flagpole {
                x: layout.flagpole_x,
                reached: false,
            },
            layout,
            rng: Pcg32::seed_from_u64(seed),
            lives: START_LIVES,
            score: START_SCORE,
            phase: GamePhase::Playing,
            paused: true,
            time_ticks: 0,
            scroll: 0.0,
            platforms,
            canyons,
            collectables: Vec::new(),
            clouds: Vec::new(),
            lava: Vec::new(),
            max_lava_dots: DEFAULT_MAX_LAVA_DOTS,
            controls: Controls::default(),
            velocity_reset: ResetTimer::default(),
        };
        state.start_game();

        log::info!(
            "New game: seed={}, viewport={}x{}, {} collectables, {} platforms",
            seed,
            viewport.width,
            viewport.height,
            state.collectables.len(),
            state.platforms.len()
        );

        Ok(state)
    }

    /// The shipped level
    pub fn classic(seed: u64, viewport: Viewport) -> ConfigResult<Self> {
        Self::new(seed, viewport, WorldLayout::classic(&viewport))
    }

    /// Reset every per-life field. Lives, seed, RNG stream and the pause flag
    /// carry over.
    pub fn start_game(&mut self) {
        let viewport = self.viewport;
        let floor = viewport.floor_y();

        self.score = START_SCORE;
        self.phase = GamePhase::Playing;
        self.scroll = 0.0;
        self.character = Character::spawn(&viewport);
        self.physics = PhysicsParams::new(&viewport);
        self.enemy = Enemy::spawn(self.layout.enemy_start_x, &viewport);
        self.flagpole = Flagpole {
            x: self.layout.flagpole_x,
            reached: false,
        };
        self.collectables = self
            .layout
            .collectables
            .iter()
            .map(|c| Collectable {
                x: c.x,
                y: floor - c.elevation,
                size: c.size,
                found: false,
            })
            .collect();
        self.clouds = self
            .layout
            .clouds
            .iter()
            .map(|c| Cloud {
                x: c.x,
                y: floor - c.altitude,
            })
            .collect();
        self.lava.clear();
        self.controls = Controls::default();
        self.velocity_reset.cancel();
    }

    /// Throw away a finished game and start over with full lives, unpaused
    pub fn new_playthrough(&mut self) {
        self.lives = START_LIVES;
        self.paused = false;
        self.start_game();
        log::info!("New playthrough (seed {})", self.seed);
    }

    /// The character can still act
    pub fn is_alive(&self) -> bool {
        self.lives > 0 && self.phase != GamePhase::GameOver
    }

    /// No further world updates happen in this phase
    pub fn is_frozen(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// Recompute world x from screen x and scroll
    pub fn sync_world_x(&mut self) {
        self.character.world_x = self.character.screen_x - self.scroll;
    }

    pub fn found_count(&self) -> usize {
        self.collectables.iter().filter(|c| c.found).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::classic(1, Viewport::default()).expect("classic layout");
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 50);
        assert!(state.paused);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.character.y, state.viewport.floor_y());
        assert_eq!(state.character.world_x, state.character.screen_x - state.scroll);
        assert_eq!(state.enemy.pos.x, 1500.0);
        assert_eq!(state.enemy.vel, Vec2::new(-3.0, 0.0));
        assert!(state.collectables.iter().all(|c| !c.found));
    }

    #[test]
    fn test_start_game_keeps_lives() {
        let mut state = GameState::classic(1, Viewport::default()).expect("classic layout");
        state.lives = 2;
        state.score = -10;
        state.scroll = -300.0;
        state.collectables[0].found = true;
        state.physics.x_vel = 9.0;
        state.character.plummeting = true;
        state.start_game();

        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 50);
        assert_eq!(state.scroll, 0.0);
        assert!(!state.collectables[0].found);
        assert_eq!(state.physics.x_vel, state.physics.base_x_vel);
        assert_eq!(state.character, Character::spawn(&state.viewport));
    }

    #[test]
    fn test_physics_velocity_cap() {
        let mut physics = PhysicsParams::new(&Viewport::default());
        for _ in 0..10_000 {
            physics.accelerate();
        }
        assert_eq!(physics.x_vel, physics.max_x_vel);

        physics.reset_velocity();
        assert_eq!(physics.x_vel, physics.base_x_vel);
    }

    #[test]
    fn test_range_penalty_floors_at_zero() {
        let mut physics = PhysicsParams::new(&Viewport::default());
        let accel = physics.x_acceleration;
        physics.apply_range_penalty(accel / 4.0);
        assert!(physics.x_acceleration < accel);
        physics.apply_range_penalty(accel * 10.0);
        assert_eq!(physics.x_acceleration, 0.0);
    }

    #[test]
    fn test_reset_timer() {
        let mut timer = ResetTimer::default();
        timer.schedule(10);
        assert!(timer.is_pending());
        assert!(!timer.fire(10 + VELOCITY_RESET_TICKS - 1));
        assert!(timer.fire(10 + VELOCITY_RESET_TICKS));
        assert!(!timer.fire(10 + VELOCITY_RESET_TICKS + 1));

        timer.schedule(0);
        timer.schedule(5);
        assert!(!timer.fire(VELOCITY_RESET_TICKS));
        assert!(timer.fire(5 + VELOCITY_RESET_TICKS));

        timer.schedule(0);
        timer.cancel();
        assert!(!timer.fire(1_000));
    }

    #[test]
    fn test_pose() {
        let mut c = Character::spawn(&Viewport::default());
        assert_eq!(c.pose(false), Pose::Standing);
        c.moving_left = true;
        assert_eq!(c.pose(false), Pose::WalkLeft);
        c.falling = true;
        assert_eq!(c.pose(false), Pose::JumpLeft);
        c.moving_left = false;
        assert_eq!(c.pose(false), Pose::JumpFront);
        c.moving_right = true;
        assert_eq!(c.pose(false), Pose::JumpRight);
        assert_eq!(c.pose(true), Pose::Standing);
    }
}
