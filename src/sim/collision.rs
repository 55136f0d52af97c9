//! Collision and interaction checks
//!
//! All checks are O(1) range or distance tests. Screen y grows downward, so
//! "below" means a larger y.

use super::state::{Canyon, Collectable, Platform};
use crate::consts::{COLLECT_RADIUS, ENEMY_RANGE, FLAGPOLE_RADIUS};
use crate::distance;
use crate::world::Viewport;

/// Character stands on a platform when inside its span (plus margin) and at
/// most `band` below its top surface.
pub fn platform_contact(
    platform: &Platform,
    world_x: f32,
    char_y: f32,
    margin: f32,
    band: f32,
) -> bool {
    let in_span =
        world_x > platform.x - margin && world_x < platform.x + platform.length + margin;
    if !in_span {
        return false;
    }
    let depth = char_y - platform.y;
    depth >= 0.0 && depth < band
}

/// Platform the character should snap to, if any.
///
/// When several platforms are in contact the one whose top is closest to the
/// character wins; equal distances go to the lower index.
pub fn resting_platform(
    platforms: &[Platform],
    world_x: f32,
    char_y: f32,
    viewport: &Viewport,
) -> Option<usize> {
    platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| p.contact(world_x, char_y, viewport))
        .min_by(|(ia, a), (ib, b)| {
            let da = (char_y - a.y).abs();
            let db = (char_y - b.y).abs();
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        })
        .map(|(i, _)| i)
}

/// Character is over the pit (inside the edge margins) and at or below the floor
pub fn over_canyon(canyon: &Canyon, world_x: f32, char_y: f32, margin: f32, floor_y: f32) -> bool {
    world_x > canyon.x + margin && world_x < canyon.x + canyon.width - margin && char_y >= floor_y
}

/// Character's upper body is close enough to the item to pick it up
pub fn collectable_reached(
    world_x: f32,
    char_y: f32,
    char_height: f32,
    item: &Collectable,
) -> bool {
    distance(world_x, char_y - char_height / 2.0, item.x, item.y) < COLLECT_RADIUS
}

pub fn flagpole_reached(world_x: f32, flagpole_x: f32) -> bool {
    (world_x - flagpole_x).abs() < FLAGPOLE_RADIUS
}

/// Enemy beam covers the character. `offset` shifts the beam origin from the
/// ship's x.
pub fn enemy_in_range(world_x: f32, enemy_x: f32, offset: f32) -> bool {
    (world_x - (enemy_x + offset)).abs() < ENEMY_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;

    /// band = 32, platform margin = 8, canyon margin = 3.2, enemy offset = 32
    fn viewport() -> Viewport {
        Viewport {
            width: 1920.0,
            height: 1024.0,
        }
    }

    #[test]
    fn test_platform_contact_band() {
        let v = viewport();
        let p = Platform {
            x: 500.0,
            y: 600.0,
            length: 40.0,
        };

        assert!(p.contact(505.0, 605.0, &v));
        assert!(!p.contact(505.0, 640.0, &v));

        // Band boundary: exclusive at the limit, inclusive at the top
        assert!(p.contact(505.0, 600.0, &v));
        assert!(p.contact(505.0, 600.0 + v.platform_band() - 0.01, &v));
        assert!(!p.contact(505.0, 600.0 + v.platform_band(), &v));
        // Above the top never counts
        assert!(!p.contact(505.0, 599.0, &v));
    }

    #[test]
    fn test_platform_contact_span() {
        let v = viewport();
        let p = Platform {
            x: 500.0,
            y: 600.0,
            length: 40.0,
        };
        let margin = v.platform_margin();

        assert!(p.contact(500.0 - margin + 0.5, 605.0, &v));
        assert!(!p.contact(500.0 - margin, 605.0, &v));
        assert!(p.contact(540.0 + margin - 0.5, 605.0, &v));
        assert!(!p.contact(540.0 + margin, 605.0, &v));
    }

    #[test]
    fn test_resting_platform_prefers_closest_top() {
        let v = viewport();
        let platforms = [
            Platform {
                x: 500.0,
                y: 590.0,
                length: 40.0,
            },
            Platform {
                x: 530.0,
                y: 600.0,
                length: 40.0,
            },
        ];

        // Both in contact at x=535, y=605: the second top is 5 away, the first 15
        assert_eq!(resting_platform(&platforms, 535.0, 605.0, &v), Some(1));
        // Only the first is in span
        assert_eq!(resting_platform(&platforms, 505.0, 595.0, &v), Some(0));
        assert_eq!(resting_platform(&platforms, 100.0, 595.0, &v), None);
    }

    #[test]
    fn test_resting_platform_tie_goes_to_lower_index() {
        let v = viewport();
        let platforms = [
            Platform {
                x: 500.0,
                y: 600.0,
                length: 40.0,
            },
            Platform {
                x: 520.0,
                y: 600.0,
                length: 40.0,
            },
        ];
        assert_eq!(resting_platform(&platforms, 530.0, 601.0, &v), Some(0));
    }

    #[test]
    fn test_over_canyon() {
        let v = viewport();
        let canyon = Canyon {
            x: 1130.0,
            width: 60.0,
        };
        let margin = v.canyon_margin();
        let floor = v.floor_y();

        assert!(over_canyon(&canyon, 1160.0, floor, margin, floor));
        // Jumping over it is safe
        assert!(!over_canyon(&canyon, 1160.0, floor - 1.0, margin, floor));
        // Edges are solid ground
        assert!(!over_canyon(&canyon, 1130.0 + margin, floor, margin, floor));
        assert!(!over_canyon(&canyon, 1190.0 - margin, floor, margin, floor));
        assert!(!over_canyon(&canyon, 1000.0, floor, margin, floor));
    }

    #[test]
    fn test_collectable_reached() {
        let item = Collectable {
            x: 350.0,
            y: 500.0,
            size: 100.0,
            found: false,
        };
        let char_height = 50.0;

        // Upper body at (350, 525): 25 away
        assert!(collectable_reached(350.0, 550.0, char_height, &item));
        // Upper body at (390, 500): exactly 40 away is not enough
        assert!(!collectable_reached(390.0, 525.0, char_height, &item));
        assert!(collectable_reached(389.9, 525.0, char_height, &item));
    }

    #[test]
    fn test_flagpole_reached() {
        assert!(flagpole_reached(3700.0, 3700.0));
        assert!(flagpole_reached(3690.5, 3700.0));
        assert!(!flagpole_reached(3690.0, 3700.0));
        assert!(!flagpole_reached(3710.0, 3700.0));
    }

    #[test]
    fn test_enemy_range_boundary() {
        let offset = 30.0;

        // |100 - (70 + 30)| = 0
        assert!(enemy_in_range(100.0, 70.0, offset));
        // |100 - (40 + 30)| = 30: not in range
        assert!(!enemy_in_range(100.0, 40.0, offset));
        assert!(!enemy_in_range(100.0, 100.0, offset));
        // 29.5 away on either side
        assert!(enemy_in_range(100.0, 40.5, offset));
        assert!(enemy_in_range(100.0, 99.5, offset));
    }
}
