//! Read-only view of the game for the presentation layer
//!
//! A snapshot carries everything needed to draw one frame and nothing the
//! renderer could use to mutate the simulation.

use serde::Serialize;

use super::lava::LavaDot;
use super::state::{Canyon, Cloud, Collectable, Flagpole, GamePhase, GameState, Platform, Pose};
use crate::world::{MountainDef, TreeDef, Viewport};

#[derive(Debug, Clone, Serialize)]
pub struct CharacterView {
    pub screen_x: f32,
    pub y: f32,
    pub world_x: f32,
    pub pose: Pose,
    pub plummeting: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    /// World position
    pub x: f32,
    pub y: f32,
    /// Beam is draining the character this tick
    pub in_range: bool,
    pub friendly: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub viewport: Viewport,
    pub floor_y: f32,
    pub scroll: f32,
    pub time_ticks: u64,
    pub score: i64,
    pub lives: u8,
    pub phase: GamePhase,
    pub paused: bool,
    /// Won or game over: the scene no longer changes
    pub frozen: bool,
    pub character: CharacterView,
    pub enemy: EnemyView,
    pub flagpole: Flagpole,
    pub canyons: Vec<Canyon>,
    pub platforms: Vec<Platform>,
    /// Items still on the map
    pub collectables: Vec<Collectable>,
    pub collected: usize,
    pub clouds: Vec<Cloud>,
    pub mountains: Vec<MountainDef>,
    pub trees: Vec<TreeDef>,
    pub lava: Vec<LavaDot>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let c = &self.character;
        Snapshot {
            viewport: self.viewport,
            floor_y: self.viewport.floor_y(),
            scroll: self.scroll,
            time_ticks: self.time_ticks,
            score: self.score,
            lives: self.lives,
            phase: self.phase,
            paused: self.paused,
            frozen: self.is_frozen(),
            character: CharacterView {
                screen_x: c.screen_x,
                y: c.y,
                world_x: c.world_x,
                pose: c.pose(self.flagpole.reached),
                plummeting: c.plummeting,
            },
            enemy: EnemyView {
                x: self.enemy.pos.x,
                y: self.enemy.pos.y,
                in_range: self.enemy.in_range,
                friendly: self.enemy.friendly,
            },
            flagpole: self.flagpole,
            canyons: self.canyons.clone(),
            platforms: self.platforms.clone(),
            collectables: self
                .collectables
                .iter()
                .filter(|item| !item.found)
                .copied()
                .collect(),
            collected: self.found_count(),
            clouds: self.clouds.clone(),
            mountains: self.layout.mountains.clone(),
            trees: self.layout.trees.clone(),
            lava: self.lava.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_hides_found_items() {
        let mut state = GameState::classic(5, Viewport::default()).expect("classic layout");
        state.collectables[0].found = true;
        state.collectables[3].found = true;

        let snap = state.snapshot();
        assert_eq!(snap.collectables.len(), state.collectables.len() - 2);
        assert_eq!(snap.collected, 2);
        assert!(snap.paused);
        assert!(!snap.frozen);
        assert_eq!(snap.character.pose, Pose::Standing);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::classic(5, Viewport::default()).expect("classic layout");
        let json = serde_json::to_value(state.snapshot()).expect("serialize");
        assert_eq!(json["score"], 50);
        assert_eq!(json["lives"], 3);
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["character"]["pose"], "Standing");
    }
}
