//! Fixed timestep simulation tick
//!
//! One call advances the game by one frame. Processing order:
//!   1. Pause toggle, terminal-phase restart
//!   2. Direction keys, velocity reset timer, jump
//!   3. Flagpole (may freeze the scene)
//!   4. Plummet gravity, canyon checks
//!   5. Enemy chase, lava, clouds
//!   6. Collectables
//!   7. Life check (may respawn or end the game)
//!   8. Enemy beam: range flag, score drain, acceleration penalty
//!   9. Horizontal movement / scrolling, vertical movement / platforms

use super::collision::{
    collectable_reached, enemy_in_range, flagpole_reached, over_canyon, resting_platform,
};
use super::state::{Controls, GamePhase, GameState};
use super::{enemy, lava};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left direction key is held
    pub left: bool,
    /// Right direction key is held
    pub right: bool,
    /// Action key pressed this tick (jump, or restart once the game has ended)
    pub action: bool,
    /// Pause toggle (pointer click)
    pub pause: bool,
}

/// Discrete happenings the presentation layer reacts to (sound cues, logs).
/// Each fires once per qualifying transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    Collect { index: usize },
    /// A life was lost; `lives_left` may be zero
    Death { lives_left: u8 },
    /// Last life lost; the death cue should be cut
    GameOver,
    Win { score: i64 },
    /// A finished game was replaced with a fresh playthrough
    Restart,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause && !state.is_frozen() {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }

    // Won / GameOver: the scene is frozen, only a fresh game gets out
    if state.is_frozen() {
        if input.action {
            state.new_playthrough();
            events.push(GameEvent::Restart);
        }
        return events;
    }
    if state.paused {
        return events;
    }

    state.time_ticks += 1;

    handle_direction_keys(state, input);
    if input.action {
        try_jump(state, &mut events);
    }

    if check_flagpole(state, &mut events) {
        return events;
    }

    if state.character.plummeting {
        state.character.y += state.physics.gravity;
    }
    check_canyons(state);

    enemy::chase(
        &mut state.enemy,
        state.character.world_x,
        &state.viewport,
        &mut state.rng,
    );
    lava::step(
        &mut state.lava,
        &state.canyons,
        state.viewport.lava_y(),
        state.max_lava_dots,
        &mut state.rng,
    );
    drift_clouds(state);

    check_collectables(state, &mut events);

    if check_life(state, &mut events) {
        return events;
    }

    apply_enemy_beam(state);

    move_horizontal(state);
    state.sync_world_x();
    move_vertical(state);

    events
}

/// Track key transitions: releases schedule a velocity reset, presses
/// cancel a pending one.
fn handle_direction_keys(state: &mut GameState, input: &TickInput) {
    let prev = state.controls;
    let released = (prev.left_held && !input.left) || (prev.right_held && !input.right);
    let pressed = (!prev.left_held && input.left) || (!prev.right_held && input.right);

    if released {
        state.velocity_reset.schedule(state.time_ticks);
    }
    if pressed {
        state.velocity_reset.cancel();
    }
    if state.velocity_reset.fire(state.time_ticks) {
        state.physics.reset_velocity();
    }

    state.controls = Controls {
        left_held: input.left,
        right_held: input.right,
    };

    let c = &mut state.character;
    c.moving_left = input.left && !c.plummeting;
    c.moving_right = input.right && !c.plummeting;
}

fn try_jump(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let c = &mut state.character;
    if !c.grounded || c.plummeting {
        return;
    }
    c.y -= state.physics.jump_impulse;
    c.grounded = false;
    c.falling = true;
    events.push(GameEvent::Jump);
}

fn check_flagpole(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.flagpole.reached || !flagpole_reached(state.character.world_x, state.flagpole.x) {
        return false;
    }

    state.flagpole.reached = true;
    state.score += FLAGPOLE_SCORE;
    state.enemy.friendly = true;
    state.enemy.in_range = false;
    state.enemy.vel = glam::Vec2::ZERO;

    if state.lives > 0 {
        state.phase = GamePhase::Won;
        events.push(GameEvent::Win { score: state.score });
        log::info!(
            "Flagpole reached: score {}, {} of {} collectables",
            state.score,
            state.found_count(),
            state.collectables.len()
        );
    }
    true
}

fn check_canyons(state: &mut GameState) {
    let margin = state.viewport.canyon_margin();
    let floor = state.viewport.floor_y();
    let c = &mut state.character;

    let falling_in = state
        .canyons
        .iter()
        .any(|canyon| over_canyon(canyon, c.world_x, c.y, margin, floor));
    if falling_in && !c.plummeting {
        log::debug!("Plummeting at world x {:.1}", c.world_x);
    }
    if falling_in {
        c.plummeting = true;
        c.moving_left = false;
        c.moving_right = false;
        c.grounded = false;
    }
}

fn drift_clouds(state: &mut GameState) {
    use rand::Rng;

    for cloud in &mut state.clouds {
        cloud.x -= CLOUD_DRIFT;
        cloud.y += cloud.y * state.rng.random_range(-CLOUD_JITTER..CLOUD_JITTER);
    }
}

fn check_collectables(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let char_height = state.viewport.character_height();
    let c = &state.character;

    for (index, item) in state.collectables.iter_mut().enumerate() {
        if item.found || !collectable_reached(c.world_x, c.y, char_height, item) {
            continue;
        }
        item.found = true;
        state.score += COLLECTABLE_SCORE;
        events.push(GameEvent::Collect { index });
        log::debug!("Collected item {} at x {:.0}, score {}", index, item.x, state.score);
    }
}

/// Fell out of the world or ran out of score: lose a life, then respawn or
/// end the game. Returns true when a life was lost.
fn check_life(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let fell = state.character.y > state.viewport.death_y();
    if !fell && state.score >= 1 {
        return false;
    }

    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::Death {
        lives_left: state.lives,
    });

    if state.lives > 0 {
        log::info!(
            "Life lost ({}), {} remaining",
            if fell { "fell" } else { "score exhausted" },
            state.lives
        );
        state.start_game();
    } else {
        log::info!("Game over at tick {}", state.time_ticks);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
    }
    true
}

fn apply_enemy_beam(state: &mut GameState) {
    let in_range = !state.enemy.friendly
        && enemy_in_range(
            state.character.world_x,
            state.enemy.pos.x,
            state.viewport.enemy_offset(),
        );
    state.enemy.in_range = in_range;

    if in_range {
        state
            .physics
            .apply_range_penalty(state.viewport.range_penalty());
        if state.is_alive() {
            state.score -= ENEMY_DRAIN;
        }
    }
}

/// Walk inside the middle band of the screen; push the world past its edges.
fn move_horizontal(state: &mut GameState) {
    let width = state.viewport.width;
    let c = &mut state.character;

    if c.moving_left {
        if c.screen_x > width * WALK_BAND_MIN {
            c.screen_x -= state.physics.x_vel;
            state.physics.accelerate();
        } else {
            state.scroll += LEFT_SCROLL_RATE;
        }
    }

    if c.moving_right {
        if c.screen_x < width * WALK_BAND_MAX {
            c.screen_x += state.physics.x_vel;
            state.physics.accelerate();
        } else {
            state.scroll -= state.viewport.right_scroll_rate();
        }
    }
}

/// Gravity, landing and platform snapping. Plummeting is handled separately.
fn move_vertical(state: &mut GameState) {
    let floor = state.viewport.floor_y();
    let c = &mut state.character;

    if c.plummeting {
        c.grounded = false;
        return;
    }

    if c.y < floor - GROUND_EPSILON {
        match resting_platform(&state.platforms, c.world_x, c.y, &state.viewport) {
            Some(i) => {
                c.y = state.platforms[i].y;
                c.grounded = true;
                c.falling = false;
            }
            None => {
                c.y = (c.y + state.physics.gravity).min(floor);
                c.grounded = false;
                c.falling = true;
            }
        }
    } else {
        c.y = floor;
        // Floor level over a pit is not ground; the next canyon check drops it
        let margin = state.viewport.canyon_margin();
        c.grounded = !state
            .canyons
            .iter()
            .any(|canyon| over_canyon(canyon, c.world_x, c.y, margin, floor));
        c.falling = false;
    }
}
