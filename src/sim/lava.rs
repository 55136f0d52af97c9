//! Boiling lava above the canyons
//!
//! Every tick each canyon spawns a dot carrying four x positions spread across
//! its width. Dots drift upward, jitter sideways, shrink and fade. Purely
//! visual: nothing in gameplay reads them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Canyon;

/// Alpha below which a dot is discarded
pub const LAVA_MIN_ALPHA: f32 = 25.0;
const LAVA_START_SIZE: f32 = 10.0;
const LAVA_START_ALPHA: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LavaDot {
    /// Bubble x positions at 20/40/60/80 % of the canyon width
    pub xs: [f32; 4],
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
}

impl LavaDot {
    pub fn spawn(canyon: &Canyon, y: f32) -> Self {
        let at = |f: f32| canyon.x + f * canyon.width;
        Self {
            xs: [at(0.2), at(0.4), at(0.6), at(0.8)],
            y,
            size: LAVA_START_SIZE,
            alpha: LAVA_START_ALPHA,
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        self.xs[0] += rng.random_range(-2.0_f32..2.0);
        self.xs[1] += rng.random_range(-5.0_f32..5.0);
        self.xs[2] += rng.random_range(-5.0_f32..5.0);
        self.xs[3] += rng.random_range(-2.0_f32..2.0);
        self.y -= rng.random_range(0.3_f32..0.5);
        self.alpha -= rng.random_range(-2.0_f32..6.0);
        self.size = (self.size - rng.random_range(0.2_f32..0.3)).max(0.0);
    }

    pub fn is_spent(&self) -> bool {
        self.alpha < LAVA_MIN_ALPHA
    }
}

/// Spawn one dot per canyon, age every dot, drop the spent ones and enforce
/// the cap (oldest dots go first).
pub fn step<R: Rng>(dots: &mut Vec<LavaDot>, canyons: &[Canyon], y: f32, cap: usize, rng: &mut R) {
    for dot in dots.iter_mut() {
        dot.update(rng);
    }
    dots.retain(|d| !d.is_spent());

    if cap == 0 {
        dots.clear();
        return;
    }
    dots.extend(canyons.iter().map(|c| LavaDot::spawn(c, y)));
    if dots.len() > cap {
        let excess = dots.len() - cap;
        dots.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn canyon() -> Canyon {
        Canyon {
            x: 1000.0,
            width: 100.0,
        }
    }

    #[test]
    fn test_spawn_positions() {
        let dot = LavaDot::spawn(&canyon(), 800.0);
        assert_eq!(dot.xs, [1020.0, 1040.0, 1060.0, 1080.0]);
        assert_eq!(dot.size, 10.0);
        assert_eq!(dot.alpha, 200.0);
    }

    #[test]
    fn test_dots_rise_and_eventually_expire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut dot = LavaDot::spawn(&canyon(), 800.0);
        let mut ticks = 0;
        while !dot.is_spent() {
            dot.update(&mut rng);
            ticks += 1;
            assert!(ticks < 10_000, "lava dot never expired");
        }
        assert!(dot.y < 800.0);
        assert!(dot.size >= 0.0);
    }

    #[test]
    fn test_step_spawns_per_canyon_and_caps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let canyons = [canyon(), Canyon { x: 2000.0, width: 60.0 }];
        let mut dots = Vec::new();

        step(&mut dots, &canyons, 800.0, 100, &mut rng);
        assert_eq!(dots.len(), 2);

        for _ in 0..500 {
            step(&mut dots, &canyons, 800.0, 100, &mut rng);
            assert!(dots.len() <= 100);
        }
        assert!(dots.iter().all(|d| !d.is_spent()));

        step(&mut dots, &canyons, 800.0, 0, &mut rng);
        assert!(dots.is_empty());
    }
}
