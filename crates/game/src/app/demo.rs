use engine::{Actor, InputSnapshot, WorldMap, WorldSource};
use tracing::debug;

use super::scene_file::LoadedScene;

/// Cells the player crosses per second while a direction is held.
const PLAYER_STEPS_PER_SECOND: f32 = 6.0;

/// Walks the player one cell at a time on held input; NPCs stand still.
#[derive(Debug)]
pub(crate) struct DemoWorld {
    map: WorldMap,
    actors: Vec<Actor>,
}

impl DemoWorld {
    /// `scene.actors[0]` is the player and the camera anchor.
    pub(crate) fn new(scene: LoadedScene) -> Option<Self> {
        if scene.actors.is_empty() {
            return None;
        }
        Some(Self {
            map: scene.map,
            actors: scene.actors,
        })
    }
}

impl WorldSource for DemoWorld {
    fn map(&self) -> &WorldMap {
        &self.map
    }

    fn camera_anchor(&self) -> &Actor {
        &self.actors[0]
    }

    fn actors(&self) -> &[Actor] {
        &self.actors
    }

    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        let step_fraction = fixed_dt_seconds * PLAYER_STEPS_PER_SECOND;
        for actor in &mut self.actors {
            actor.advance(step_fraction);
        }

        let player = &mut self.actors[0];
        if !player.is_settled() {
            return;
        }
        if let Some(facing) = input.held_direction() {
            player.step(facing, &self.map);
            debug!(
                x = player.grid.x,
                y = player.grid.y,
                facing = facing.name(),
                "player_stepped"
            );
        }
    }
}
