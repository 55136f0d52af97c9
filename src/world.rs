//! Static world layout and viewport scaling
//!
//! The layout is built once and never mutated. Runtime flags (found, reached)
//! live in `sim::state`. Vertical positions are stored as elevations above the
//! floor so one layout fits any viewport.

use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_X_FRACTION;
use crate::error::{ConfigError, ConfigResult};

/// Display dimensions. Every distance that scales with the screen is derived
/// here so the physics feel the same on any display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> ConfigResult<Self> {
        let viewport = Self { width, height };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Ground plane y (screen y grows downward)
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height * 3.0 / 4.0
    }

    /// Falling past this y costs a life
    #[inline]
    pub fn death_y(&self) -> f32 {
        let floor = self.floor_y();
        floor + (self.height - floor) * 3.0 / 4.0
    }

    #[inline]
    pub fn base_x_vel(&self) -> f32 {
        self.width / 720.0
    }

    #[inline]
    pub fn x_acceleration(&self) -> f32 {
        self.width / 72_000.0
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.height / 256.0
    }

    #[inline]
    pub fn jump_impulse(&self) -> f32 {
        self.height / 8.0
    }

    /// Acceleration lost per tick under the enemy beam
    #[inline]
    pub fn range_penalty(&self) -> f32 {
        self.width / 3_600_000.0
    }

    /// Inset from each canyon edge before the character drops
    #[inline]
    pub fn canyon_margin(&self) -> f32 {
        self.width / 600.0
    }

    /// Horizontal slack past each platform end
    #[inline]
    pub fn platform_margin(&self) -> f32 {
        self.width / 240.0
    }

    /// Depth below a platform top that still counts as standing on it
    #[inline]
    pub fn platform_band(&self) -> f32 {
        self.height / 32.0
    }

    #[inline]
    pub fn right_scroll_rate(&self) -> f32 {
        self.width / 400.0
    }

    /// Enemy backs off once further ahead than this
    #[inline]
    pub fn enemy_lead(&self) -> f32 {
        self.width / 20.0
    }

    /// Enemy catches up once further behind than this
    #[inline]
    pub fn enemy_trail(&self) -> f32 {
        self.width / 10.0
    }

    /// Beam origin offset from the enemy's x
    #[inline]
    pub fn enemy_offset(&self) -> f32 {
        self.width / 60.0
    }

    /// Vertical band the enemy hovers in
    #[inline]
    pub fn enemy_band(&self) -> (f32, f32) {
        (self.height * 0.25, self.height * 0.4)
    }

    #[inline]
    pub fn enemy_start_y(&self) -> f32 {
        self.height / 3.0
    }

    #[inline]
    pub fn character_height(&self) -> f32 {
        self.height / 20.0
    }

    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.width * SPAWN_X_FRACTION
    }

    /// Spawn height of lava dots
    #[inline]
    pub fn lava_y(&self) -> f32 {
        3.05 * (self.height - self.floor_y())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudDef {
    pub x: f32,
    /// Height above the floor
    pub altitude: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountainDef {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDef {
    pub x: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanyonDef {
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectableDef {
    pub x: f32,
    pub elevation: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub elevation: f32,
    pub length: f32,
}

/// Complete static description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    #[serde(default)]
    pub clouds: Vec<CloudDef>,
    #[serde(default)]
    pub mountains: Vec<MountainDef>,
    #[serde(default)]
    pub trees: Vec<TreeDef>,
    pub canyons: Vec<CanyonDef>,
    pub collectables: Vec<CollectableDef>,
    pub platforms: Vec<PlatformDef>,
    pub flagpole_x: f32,
    pub enemy_start_x: f32,
}

impl WorldLayout {
    /// The hand-built level the game ships with.
    pub fn classic(viewport: &Viewport) -> Self {
        let platform_elevation = viewport.floor_y() / 8.0;

        let clouds = [
            600.0, 800.0, 2300.0, 2500.0, 3100.0, 1400.0, 1820.0, 2120.0, 2730.0, 2815.0, 3400.0,
            3600.0,
        ]
        .into_iter()
        .map(|x| CloudDef { x, altitude: 320.0 })
        .collect();

        let mountains = [
            (200.0, 70.0, 240.0),
            (600.0, 60.0, 240.0),
            (800.0, 70.0, 220.0),
            (1000.0, 50.0, 240.0),
            (1800.0, 70.0, 240.0),
            (2200.0, 70.0, 240.0),
            (2500.0, 60.0, 220.0),
            (3400.0, 80.0, 260.0),
        ]
        .into_iter()
        .map(|(x, width, height)| MountainDef { x, width, height })
        .collect();

        let trees = [
            (100.0, 40.0),
            (300.0, 50.0),
            (700.0, 60.0),
            (900.0, 70.0),
            (1100.0, 40.0),
            (1300.0, 50.0),
            (1700.0, 60.0),
            (1900.0, 60.0),
            (2100.0, 70.0),
            (2300.0, 80.0),
            (2500.0, 40.0),
            (2900.0, 50.0),
        ]
        .into_iter()
        .map(|(x, height)| TreeDef { x, height })
        .collect();

        let canyons = [
            (1130.0, 60.0),
            (1430.0, 80.0),
            (1930.0, 60.0),
            (2430.0, 60.0),
            (2630.0, 160.0),
            (2980.0, 100.0),
        ]
        .into_iter()
        .map(|(x, width)| CanyonDef { x, width })
        .collect();

        let collectables = [
            (350.0, 40.0),
            (520.0, 120.0),
            (690.0, 40.0),
            (1270.0, 120.0),
            (1360.0, 40.0),
            (1620.0, 120.0),
            (1820.0, 120.0),
            (2020.0, 120.0),
            (2215.0, 120.0),
            (2650.0, 220.0),
            (2730.0, 220.0),
            (2815.0, 180.0),
            (2950.0, 120.0),
            (3400.0, 80.0),
            (3500.0, 100.0),
            (3600.0, 120.0),
        ]
        .into_iter()
        .map(|(x, elevation)| CollectableDef {
            x,
            elevation,
            size: 100.0,
        })
        .collect();

        let platforms = [
            (400.0, 40.0),
            (500.0, 40.0),
            (600.0, 40.0),
            (1250.0, 40.0),
            (1600.0, 40.0),
            (1700.0, 40.0),
            (1800.0, 40.0),
            (2000.0, 40.0),
            (2100.0, 40.0),
            (2200.0, 30.0),
            (2300.0, 30.0),
            (2620.0, 30.0),
            (2730.0, 30.0),
            (2850.0, 30.0),
        ]
        .into_iter()
        .map(|(x, length)| PlatformDef {
            x,
            elevation: platform_elevation,
            length,
        })
        .collect();

        Self {
            clouds,
            mountains,
            trees,
            canyons,
            collectables,
            platforms,
            flagpole_x: 3700.0,
            enemy_start_x: 1500.0,
        }
    }

    /// Parse a layout from JSON and validate it against the viewport.
    pub fn from_json(json: &str, viewport: &Viewport) -> ConfigResult<Self> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate(viewport)?;
        Ok(layout)
    }

    /// Reject layouts that would produce inconsistent physics.
    pub fn validate(&self, viewport: &Viewport) -> ConfigResult<()> {
        viewport.validate()?;
        self.check_finite()?;

        for (index, canyon) in self.canyons.iter().enumerate() {
            positive("canyon", index, canyon.width)?;
            if canyon.width <= 2.0 * viewport.canyon_margin() {
                return Err(ConfigError::CanyonTooNarrow { index });
            }
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            positive("platform", index, platform.length)?;
            positive("platform elevation", index, platform.elevation)?;
        }
        for (index, item) in self.collectables.iter().enumerate() {
            positive("collectable", index, item.size)?;
        }
        for (index, mountain) in self.mountains.iter().enumerate() {
            positive("mountain", index, mountain.width)?;
            positive("mountain", index, mountain.height)?;
        }
        for (index, tree) in self.trees.iter().enumerate() {
            positive("tree", index, tree.height)?;
        }

        if let Some((a, b)) = first_overlap(self.canyons.iter().map(|c| (c.x, c.x + c.width))) {
            return Err(ConfigError::OverlappingCanyons { a, b });
        }
        if let Some((a, b)) =
            first_overlap(self.platforms.iter().map(|p| (p.x, p.x + p.length)))
        {
            return Err(ConfigError::OverlappingPlatforms { a, b });
        }

        if self.flagpole_x <= viewport.spawn_x() {
            return Err(ConfigError::UnreachableFlagpole {
                x: self.flagpole_x,
                reason: "behind the spawn point",
            });
        }
        let in_canyon = self
            .canyons
            .iter()
            .any(|c| self.flagpole_x >= c.x && self.flagpole_x <= c.x + c.width);
        if in_canyon {
            return Err(ConfigError::UnreachableFlagpole {
                x: self.flagpole_x,
                reason: "inside a canyon",
            });
        }

        Ok(())
    }

    fn check_finite(&self) -> ConfigResult<()> {
        if !finite(self.clouds.iter().flat_map(|c| [c.x, c.altitude])) {
            return Err(ConfigError::NonFinite("clouds"));
        }
        if !finite(self.mountains.iter().flat_map(|m| [m.x, m.width, m.height])) {
            return Err(ConfigError::NonFinite("mountains"));
        }
        if !finite(self.trees.iter().flat_map(|t| [t.x, t.height])) {
            return Err(ConfigError::NonFinite("trees"));
        }
        if !finite(self.canyons.iter().flat_map(|c| [c.x, c.width])) {
            return Err(ConfigError::NonFinite("canyons"));
        }
        if !finite(self.collectables.iter().flat_map(|c| [c.x, c.elevation, c.size])) {
            return Err(ConfigError::NonFinite("collectables"));
        }
        if !finite(self.platforms.iter().flat_map(|p| [p.x, p.elevation, p.length])) {
            return Err(ConfigError::NonFinite("platforms"));
        }
        if !finite([self.flagpole_x, self.enemy_start_x]) {
            return Err(ConfigError::NonFinite("flagpole/enemy"));
        }
        Ok(())
    }
}

fn finite(values: impl IntoIterator<Item = f32>) -> bool {
    values.into_iter().all(f32::is_finite)
}

fn positive(kind: &'static str, index: usize, value: f32) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { kind, index, value })
    }
}

/// First pair of indices whose [start, end) spans intersect
fn first_overlap(spans: impl Iterator<Item = (f32, f32)>) -> Option<(usize, usize)> {
    let spans: Vec<(f32, f32)> = spans.collect();
    for (i, a) in spans.iter().enumerate() {
        for (j, b) in spans.iter().enumerate().skip(i + 1) {
            if a.0 < b.1 && b.0 < a.1 {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout_is_valid() {
        for viewport in [
            Viewport::default(),
            Viewport {
                width: 1280.0,
                height: 1024.0,
            },
        ] {
            let layout = WorldLayout::classic(&viewport);
            assert!(layout.validate(&viewport).is_ok());
            assert_eq!(layout.collectables.len(), 16);
            assert_eq!(layout.platforms.len(), 14);
            assert_eq!(layout.canyons.len(), 6);
        }
    }

    #[test]
    fn test_viewport_scaling() {
        let v = Viewport {
            width: 1800.0,
            height: 1024.0,
        };
        assert_eq!(v.floor_y(), 768.0);
        assert_eq!(v.death_y(), 768.0 + 256.0 * 0.75);
        assert_eq!(v.platform_band(), 32.0);
        assert_eq!(v.enemy_offset(), 30.0);
        assert_eq!(v.gravity(), 4.0);
        assert_eq!(v.jump_impulse(), 128.0);
    }

    #[test]
    fn test_invalid_viewport_rejected() {
        assert!(matches!(
            Viewport::new(0.0, 600.0),
            Err(ConfigError::InvalidViewport { .. })
        ));
        assert!(Viewport::new(f32::NAN, 600.0).is_err());
        assert!(Viewport::new(800.0, 600.0).is_ok());
    }

    #[test]
    fn test_overlapping_platforms_rejected() {
        let viewport = Viewport::default();
        let mut layout = WorldLayout::classic(&viewport);
        layout.platforms.push(PlatformDef {
            x: 420.0,
            elevation: 200.0,
            length: 40.0,
        });

        match layout.validate(&viewport) {
            Err(ConfigError::OverlappingPlatforms { a, b }) => {
                assert_eq!(a, 0);
                assert_eq!(b, 14);
            }
            other => panic!("expected overlap error, got {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_canyons_rejected() {
        let viewport = Viewport::default();
        let mut layout = WorldLayout::classic(&viewport);
        layout.canyons.push(CanyonDef {
            x: 1150.0,
            width: 60.0,
        });
        assert!(matches!(
            layout.validate(&viewport),
            Err(ConfigError::OverlappingCanyons { .. })
        ));
    }

    #[test]
    fn test_flagpole_in_canyon_rejected() {
        let viewport = Viewport::default();
        let mut layout = WorldLayout::classic(&viewport);
        layout.flagpole_x = 2700.0;
        assert!(matches!(
            layout.validate(&viewport),
            Err(ConfigError::UnreachableFlagpole { .. })
        ));
    }

    #[test]
    fn test_narrow_canyon_rejected() {
        let viewport = Viewport::default();
        let mut layout = WorldLayout::classic(&viewport);
        layout.canyons[0].width = viewport.canyon_margin();
        assert!(matches!(
            layout.validate(&viewport),
            Err(ConfigError::CanyonTooNarrow { index: 0 })
        ));
    }

    #[test]
    fn test_from_json() {
        let viewport = Viewport::default();
        let json = r#"{
            "canyons": [{ "x": 300.0, "width": 50.0 }],
            "collectables": [{ "x": 200.0, "elevation": 40.0, "size": 100.0 }],
            "platforms": [{ "x": 400.0, "elevation": 100.0, "length": 40.0 }],
            "flagpole_x": 900.0,
            "enemy_start_x": 600.0
        }"#;
        let layout = WorldLayout::from_json(json, &viewport).expect("valid layout");
        assert!(layout.clouds.is_empty());
        assert_eq!(layout.platforms[0].length, 40.0);

        let broken = json.replace("\"length\": 40.0", "\"length\": -1.0");
        assert!(matches!(
            WorldLayout::from_json(&broken, &viewport),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            WorldLayout::from_json("{", &viewport),
            Err(ConfigError::Json(_))
        ));
    }
}
