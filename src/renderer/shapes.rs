//! Draw-list generation for 2D primitives
//!
//! `build` walks a snapshot back to front and emits screen-space shapes. World
//! objects are shifted by the scroll offset; mountains scroll slightly slower
//! for a parallax effect. Nothing here touches the simulation.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::Snapshot;
use crate::sim::snapshot::{CharacterView, EnemyView};
use crate::sim::state::{GamePhase, Pose};
use crate::world::Viewport;

/// RGBA color, components in 0.0 - 1.0
pub type Color = [f32; 4];

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

pub mod colors {
    use super::{Color, rgb, rgba};

    pub const SKY: Color = rgb(173, 217, 230);
    pub const GROUND: Color = rgb(97, 151, 53);
    pub const MOUNTAIN_BACK: Color = rgb(210, 210, 149);
    pub const MOUNTAIN_FRONT: Color = rgb(234, 216, 113);
    pub const CLOUD: Color = rgb(111, 111, 111);
    pub const TRUNK: Color = rgb(155, 16, 113);
    pub const LEAVES: [Color; 3] = [rgb(58, 91, 32), rgb(78, 121, 42), rgb(97, 151, 53)];
    pub const LAVA: Color = rgb(200, 50, 0);
    pub const BEAM: Color = rgba(200, 50, 0, 100);
    pub const SHIP_HULL: Color = rgb(90, 90, 110);
    pub const SHIP_DOME: Color = rgb(140, 220, 200);
    pub const SHIP_FRIENDLY: Color = rgb(120, 200, 120);
    pub const COIN_RIM: Color = rgb(173, 100, 47);
    pub const COIN_GEM: Color = rgb(21, 160, 221);
    pub const PLATFORM: Color = rgb(255, 255, 255);
    pub const POLE: Color = rgb(0, 0, 0);
    pub const FLAG_DOWN: Color = rgb(130, 130, 130);
    pub const FLAG_UP: Color = rgb(230, 60, 20);
    pub const HEAD: Color = rgb(57, 55, 91);
    pub const EYE: Color = rgb(245, 176, 203);
    pub const MOUTH: Color = rgb(213, 151, 206);
    pub const HAT: Color = rgb(116, 92, 151);
    pub const LIFE: Color = rgb(204, 51, 0);
    pub const TEXT: Color = rgb(200, 50, 0);
}

/// A filled 2D primitive in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    /// Centre plus full width and height
    Ellipse {
        center: Vec2,
        w: f32,
        h: f32,
        color: Color,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
    },
    /// Left-aligned, `y` is the baseline
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
        color: Color,
    },
}

impl Shape {
    pub fn color(&self) -> Color {
        match self {
            Shape::Rect { color, .. }
            | Shape::Ellipse { color, .. }
            | Shape::Triangle { color, .. }
            | Shape::Text { color, .. } => *color,
        }
    }
}

fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> Shape {
    Shape::Rect { x, y, w, h, color }
}

fn ellipse(cx: f32, cy: f32, w: f32, h: f32, color: Color) -> Shape {
    Shape::Ellipse {
        center: Vec2::new(cx, cy),
        w,
        h,
        color,
    }
}

fn triangle(a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) -> Shape {
    Shape::Triangle {
        points: [Vec2::new(a.0, a.1), Vec2::new(b.0, b.1), Vec2::new(c.0, c.1)],
        color,
    }
}

fn text(x: f32, y: f32, size: f32, text: impl Into<String>, color: Color) -> Shape {
    Shape::Text {
        x,
        y,
        size,
        text: text.into(),
        color,
    }
}

/// Mountains scroll at this fraction of the world speed
const MOUNTAIN_PARALLAX: f32 = 0.99;
const HUD_TEXT_SIZE: f32 = 20.0;
const HINT_LINE_HEIGHT: f32 = 26.0;
const PLATFORM_THICKNESS: f32 = 10.0;
/// Flagpole top as a fraction of the canvas height
const POLE_TOP: f32 = 5.0 / 18.0;

const HINTS: [&str; 5] = [
    "Use Left and Right keys to move. Spacebar to Jump.",
    "Beware of the enemy ship! It will try to pin you down",
    "and reduce your score.",
    "If your score falls below 1, you lose a life!",
    "Click to Start/Pause!",
];

/// Build the full frame, back to front
pub fn build(snap: &Snapshot, settings: &Settings) -> Vec<Shape> {
    let v = &snap.viewport;
    let floor = snap.floor_y;
    let mut out = Vec::with_capacity(256 + snap.lava.len() * 4);

    out.push(rect(0.0, 0.0, v.width, v.height, colors::SKY));
    out.push(rect(0.0, floor, v.width, v.height - floor, colors::GROUND));

    if settings.quality.scenery_enabled() {
        scenery(snap, &mut out);
    }

    let dx = snap.scroll;
    flagpole(snap, dx, &mut out);

    for canyon in &snap.canyons {
        out.push(rect(canyon.x + dx, floor, canyon.width, v.height - floor, colors::LAVA));
    }
    for dot in &snap.lava {
        let mut color = colors::LAVA;
        color[3] = (dot.alpha / 255.0).clamp(0.0, 1.0);
        for x in dot.xs {
            out.push(ellipse(x + dx, dot.y, dot.size, dot.size, color));
        }
    }

    enemy(&snap.enemy, v, dx, &mut out);

    for item in &snap.collectables {
        let (x, y) = (item.x + dx, item.y);
        out.push(ellipse(x, y, item.size / 4.0, item.size / 4.0, colors::COIN_RIM));
        out.push(ellipse(x, y, item.size / 7.0, item.size / 5.0, colors::COIN_GEM));
    }

    for p in &snap.platforms {
        out.push(rect(p.x + dx, p.y, p.length, PLATFORM_THICKNESS, colors::PLATFORM));
    }

    character(&snap.character, v, &mut out);
    hud(snap, settings, &mut out);

    out
}

fn scenery(snap: &Snapshot, out: &mut Vec<Shape>) {
    let floor = snap.floor_y;

    let mdx = snap.scroll * MOUNTAIN_PARALLAX;
    for m in &snap.mountains {
        let back = m.x + mdx + 20.0;
        out.push(triangle(
            (back, floor),
            (back + m.width / 3.0, floor - m.height + 40.0),
            (back + m.width, floor),
            colors::MOUNTAIN_BACK,
        ));
        let front = m.x + mdx - 10.0;
        out.push(triangle(
            (front, floor),
            (front + m.width / 3.0, floor - m.height),
            (front + m.width, floor),
            colors::MOUNTAIN_FRONT,
        ));
    }

    let dx = snap.scroll;
    for cloud in &snap.clouds {
        let (x, y) = (cloud.x + dx, cloud.y);
        for (ox, oy, w, h) in [
            (4.0, 13.0, 75.0, 20.0),
            (10.0, -3.0, 40.0, 40.0),
            (30.0, 5.0, 29.0, 30.0),
            (-10.0, 2.0, 30.0, 30.0),
            (-25.0, 7.0, 25.0, 25.0),
        ] {
            out.push(ellipse(x + ox, y + oy, w, h, colors::CLOUD));
        }
    }

    for tree in &snap.trees {
        let x = tree.x + dx;
        let h = tree.height;
        out.push(rect(x, floor - h, 8.0, h, colors::TRUNK));
        // Three stacked crowns, each narrower than the last
        for (i, (base, tip, half)) in [(1.0, 2.0, 20.0), (1.4, 2.4, 18.0), (1.8, 2.6, 14.0)]
            .into_iter()
            .enumerate()
        {
            out.push(triangle(
                (x + 4.0 - half, floor - base * h),
                (x + 4.0 + half, floor - base * h),
                (x + 4.0, floor - tip * h),
                colors::LEAVES[i],
            ));
        }
    }
}

fn flagpole(snap: &Snapshot, dx: f32, out: &mut Vec<Shape>) {
    let floor = snap.floor_y;
    let x = snap.flagpole.x + dx;
    let top = snap.viewport.height * POLE_TOP;

    out.push(rect(x, top, 5.0, floor - top, colors::POLE));
    if snap.flagpole.reached {
        out.push(triangle(
            (x + 5.0, top),
            (x + 5.0, top + 20.0),
            (x + 25.0, top),
            colors::FLAG_UP,
        ));
    } else {
        out.push(triangle(
            (x, floor - 30.0),
            (x, floor - 50.0),
            (x - 20.0, floor - 30.0),
            colors::FLAG_DOWN,
        ));
    }
}

fn enemy(e: &EnemyView, v: &Viewport, dx: f32, out: &mut Vec<Shape>) {
    let (x, y) = (e.x + dx, e.y);

    if e.in_range {
        out.push(triangle(
            (x + v.width / 40.0, y + v.height / 100.0),
            (x - v.width / 40.0, y + v.height * 0.75),
            (x + 3.0 * v.width / 40.0, y + v.height * 0.75),
            colors::BEAM,
        ));
    }

    // Saucer centred on the beam origin
    let cx = x + v.enemy_offset();
    let hull = if e.friendly {
        colors::SHIP_FRIENDLY
    } else {
        colors::SHIP_HULL
    };
    out.push(ellipse(cx, y, v.width / 24.0, v.height / 60.0, hull));
    out.push(ellipse(cx, y - v.height / 120.0, v.width / 60.0, v.height / 50.0, colors::SHIP_DOME));
}

/// The hatted character at its screen position. Profile poses show one eye
/// facing the direction of travel, front poses show both.
fn character(c: &CharacterView, v: &Viewport, out: &mut Vec<Shape>) {
    let height = v.character_height();
    let width = v.width / 70.0;
    let side = v.width / 80.0;
    let eye = v.width / 200.0;
    let (x, y) = (c.screen_x, c.y);

    let facing: f32 = match c.pose {
        Pose::WalkLeft | Pose::JumpLeft => -1.0,
        Pose::WalkRight | Pose::JumpRight => 1.0,
        Pose::Standing | Pose::JumpFront => 0.0,
    };
    let airborne = matches!(c.pose, Pose::JumpLeft | Pose::JumpRight | Pose::JumpFront);
    let head_y = y - 0.6 * height;
    let eye_y = y - 0.7 * height;

    if facing == 0.0 {
        out.push(ellipse(x, head_y, width, height, colors::HEAD));
        for ex in [x - width / 4.0, x + width / 4.0] {
            out.push(ellipse(ex, eye_y, eye, eye, colors::EYE));
            out.push(ellipse(ex, eye_y, eye / 2.0, eye / 2.0, colors::HEAD));
        }
        out.push(triangle(
            (x - width / 6.0, y - 0.4 * height),
            (x + width / 6.0, y - 0.4 * height),
            (x, y - 0.3 * height),
            colors::MOUTH,
        ));
    } else {
        out.push(ellipse(x, head_y, side, height, colors::HEAD));
        let ex = x + facing * width / 5.0;
        out.push(ellipse(ex, eye_y, eye * 0.75, eye * 0.75, colors::EYE));
        out.push(ellipse(ex, eye_y, eye * 0.375, eye * 0.375, colors::HEAD));
        let mouth_x = if facing < 0.0 { x - side / 2.5 } else { x + side / 8.0 };
        out.push(rect(mouth_x, y - 0.4 * height, side / 2.5, height / 25.0, colors::MOUTH));
    }

    // Hat brim tilts back toward the trailing side
    let top = head_y - height / 2.0;
    out.push(triangle(
        (x - width / 2.0, top + 0.1 * height),
        (x + width / 2.0, top + 0.1 * height),
        (x - facing * width / 4.0, top - 0.25 * height),
        colors::HAT,
    ));

    // Feet: spread when walking or standing, tucked in the air
    let foot_y = if airborne { y - 0.1 * height } else { y };
    let spread = if airborne { width / 4.0 } else { width / 2.5 };
    for fx in [x - spread, x + spread] {
        out.push(triangle(
            (fx - width / 6.0, foot_y),
            (fx + width / 6.0, foot_y),
            (fx + facing * width / 6.0, foot_y - 0.15 * height),
            colors::HAT,
        ));
    }
}

fn hud(snap: &Snapshot, settings: &Settings, out: &mut Vec<Shape>) {
    let v = &snap.viewport;

    for i in 0..snap.lives {
        out.push(rect(
            v.width / 98.0 + 40.0 * i as f32,
            v.height / 3.5,
            v.width / 100.0,
            v.height / 80.0,
            colors::LIFE,
        ));
    }

    out.push(text(
        v.width / 98.0,
        v.height / 3.75,
        HUD_TEXT_SIZE,
        format!("Score: {}", snap.score),
        colors::TEXT,
    ));

    let message = match snap.phase {
        GamePhase::GameOver => Some("Game Over! Press Space to play again."),
        GamePhase::Won => Some("You win!!! Press Space to play again!"),
        GamePhase::Playing => None,
    };
    if let Some(message) = message {
        out.push(text(v.width / 2.5, v.height / 3.0, HUD_TEXT_SIZE, message, colors::TEXT));
    } else if snap.paused {
        if settings.show_hints {
            for (i, line) in HINTS.iter().enumerate() {
                out.push(text(
                    v.width / 3.0,
                    v.height / 3.75 + HINT_LINE_HEIGHT * i as f32,
                    HUD_TEXT_SIZE,
                    *line,
                    colors::TEXT,
                ));
            }
        } else {
            out.push(text(v.width / 3.0, v.height / 3.75, HUD_TEXT_SIZE, "Paused", colors::TEXT));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::GameState;

    fn texts(shapes: &[Shape]) -> Vec<&str> {
        shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(shapes: &[Shape], color: Color) -> usize {
        shapes.iter().filter(|s| s.color() == color).count()
    }

    fn state() -> GameState {
        GameState::classic(3, Viewport::default()).expect("classic layout")
    }

    #[test]
    fn test_frame_has_character_and_hud() {
        let state = state();
        let shapes = build(&state.snapshot(), &Settings::default());

        assert!(count(&shapes, colors::HEAD) >= 1);
        assert!(count(&shapes, colors::HAT) >= 1);
        assert_eq!(count(&shapes, colors::LIFE), 3);
        assert!(texts(&shapes).contains(&"Score: 50"));
        // New games start paused with instructions
        assert!(texts(&shapes).contains(&"Click to Start/Pause!"));
    }

    #[test]
    fn test_sky_is_drawn_first() {
        let shapes = build(&state().snapshot(), &Settings::default());
        assert_eq!(shapes[0].color(), colors::SKY);
    }

    #[test]
    fn test_found_items_not_drawn() {
        let mut state = state();
        let before = count(&build(&state.snapshot(), &Settings::default()), colors::COIN_RIM);
        state.collectables[2].found = true;
        let after = count(&build(&state.snapshot(), &Settings::default()), colors::COIN_RIM);
        assert_eq!(after, before - 1);
    }

    #[test]
    fn test_end_messages() {
        let mut state = state();
        state.phase = GamePhase::GameOver;
        state.lives = 0;
        let shapes = build(&state.snapshot(), &Settings::default());
        assert!(texts(&shapes).contains(&"Game Over! Press Space to play again."));
        assert_eq!(count(&shapes, colors::LIFE), 0);
        assert!(!texts(&shapes).contains(&"Click to Start/Pause!"));

        state.phase = GamePhase::Won;
        state.lives = 2;
        state.flagpole.reached = true;
        let shapes = build(&state.snapshot(), &Settings::default());
        assert!(texts(&shapes).contains(&"You win!!! Press Space to play again!"));
        assert_eq!(count(&shapes, colors::FLAG_UP), 1);
        assert_eq!(count(&shapes, colors::FLAG_DOWN), 0);
    }

    #[test]
    fn test_hints_follow_settings() {
        let state = state();
        let settings = Settings {
            show_hints: false,
            ..Settings::default()
        };
        let shapes = build(&state.snapshot(), &settings);
        assert_eq!(texts(&shapes), vec!["Score: 50", "Paused"]);
    }

    #[test]
    fn test_low_quality_skips_scenery() {
        let state = state();
        let preset = |quality| Settings {
            quality,
            ..Settings::default()
        };
        let high = build(&state.snapshot(), &preset(QualityPreset::High));
        let low = build(&state.snapshot(), &preset(QualityPreset::Low));
        assert!(count(&high, colors::CLOUD) > 0);
        assert_eq!(count(&low, colors::CLOUD), 0);
        assert_eq!(count(&low, colors::TRUNK), 0);
        assert_eq!(count(&low, colors::HEAD), count(&high, colors::HEAD));
    }

    #[test]
    fn test_beam_only_in_range() {
        let mut state = state();
        assert_eq!(count(&build(&state.snapshot(), &Settings::default()), colors::BEAM), 0);
        state.enemy.in_range = true;
        assert_eq!(count(&build(&state.snapshot(), &Settings::default()), colors::BEAM), 1);
    }

    #[test]
    fn test_flagpole_scales_with_canvas() {
        let mut snap = state().snapshot();
        for (width, height) in [(1920.0, 1080.0), (640.0, 360.0), (300.0, 200.0)] {
            snap.viewport = Viewport::new(width, height).expect("viewport");
            snap.floor_y = snap.viewport.floor_y();
            let pole = build(&snap, &Settings::default())
                .into_iter()
                .find_map(|s| match s {
                    Shape::Rect { y, h, color, .. } if color == colors::POLE => Some((y, h)),
                    _ => None,
                });
            let (top, h) = pole.expect("pole drawn");
            assert!(h > 0.0);
            assert!(top > 0.0);
            assert!((top + h - snap.floor_y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_world_shifts_with_scroll() {
        let mut state = state();
        let pole_x = |shapes: &[Shape]| {
            shapes.iter().find_map(|s| match s {
                Shape::Rect { x, color, .. } if *color == colors::POLE => Some(*x),
                _ => None,
            })
        };
        let before = pole_x(&build(&state.snapshot(), &Settings::default()));
        state.scroll = -100.0;
        let after = pole_x(&build(&state.snapshot(), &Settings::default()));
        assert_eq!(before.map(|x| x - 100.0), after);
    }
}
