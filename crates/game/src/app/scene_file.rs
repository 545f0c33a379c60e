use std::fs;
use std::path::{Path, PathBuf};

use engine::world::SubImageEntry;
use engine::{
    Actor, ActorKind, Facing, Gender, GridPos, Tile, TileKind, WorldMap, WorldMapError,
    WorldMapFile,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A map file plus where its actors start.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct SceneFile {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rows: Vec<String>,
    #[serde(default)]
    pub(crate) sub_images: Vec<SubImageEntry>,
    #[serde(default)]
    pub(crate) player: Option<SpawnPoint>,
    #[serde(default)]
    pub(crate) npcs: Vec<NpcSpawn>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub(crate) struct SpawnPoint {
    pub(crate) x: u32,
    pub(crate) y: u32,
    #[serde(default)]
    pub(crate) facing: SpawnFacing,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub(crate) struct NpcSpawn {
    pub(crate) x: u32,
    pub(crate) y: u32,
    #[serde(default)]
    pub(crate) facing: SpawnFacing,
    #[serde(default)]
    pub(crate) female: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SpawnFacing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl From<SpawnFacing> for Facing {
    fn from(value: SpawnFacing) -> Self {
        match value {
            SpawnFacing::Up => Facing::Up,
            SpawnFacing::Down => Facing::Down,
            SpawnFacing::Left => Facing::Left,
            SpawnFacing::Right => Facing::Right,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum SceneLoadError {
    #[error("failed to read map file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map json at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid map: {0}")]
    Invalid(#[from] WorldMapError),
    #[error("spawn ({x}, {y}) is outside the {width}x{height} world")]
    SpawnOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Map plus actors in draw order; index 0 is the player.
#[derive(Debug, Clone)]
pub(crate) struct LoadedScene {
    pub(crate) map: WorldMap,
    pub(crate) actors: Vec<Actor>,
}

pub(crate) fn load_scene_file(path: &Path) -> Result<LoadedScene, SceneLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| SceneLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene_json(&raw)
}

pub(crate) fn parse_scene_json(raw: &str) -> Result<LoadedScene, SceneLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let scene = serde_path_to_error::deserialize::<_, SceneFile>(&mut deserializer).map_err(
        |error| {
            let at = error.path().to_string();
            SceneLoadError::Parse {
                at,
                source: error.into_inner(),
            }
        },
    )?;
    scene.into_loaded()
}

impl SceneFile {
    fn into_loaded(self) -> Result<LoadedScene, SceneLoadError> {
        let map = WorldMapFile {
            width: self.width,
            height: self.height,
            rows: self.rows,
            sub_images: self.sub_images,
        }
        .into_world_map()?;
        let player = self.player.unwrap_or(SpawnPoint {
            x: map.width() / 2,
            y: map.height() / 2,
            facing: SpawnFacing::Down,
        });

        let mut actors = Vec::with_capacity(1 + self.npcs.len());
        actors.push(Actor::new(
            ActorKind::Player,
            spawn_cell(&map, player.x, player.y)?,
            player.facing.into(),
        ));
        for npc in self.npcs {
            let gender = if npc.female {
                Gender::Female
            } else {
                Gender::Male
            };
            actors.push(Actor::new(
                ActorKind::Npc { gender },
                spawn_cell(&map, npc.x, npc.y)?,
                npc.facing.into(),
            ));
        }
        Ok(LoadedScene { map, actors })
    }
}

fn spawn_cell(map: &WorldMap, x: u32, y: u32) -> Result<GridPos, SceneLoadError> {
    if map.tile_at(x, y).is_none() {
        return Err(SceneLoadError::SpawnOutOfRange {
            x,
            y,
            width: map.width(),
            height: map.height(),
        });
    }
    Ok(GridPos { x, y })
}

/// Deterministic fallback world: grass with a lake and scattered trees, the
/// player in the middle and a few NPCs around them.
pub(crate) fn generate_scene(width: u32, height: u32) -> Result<LoadedScene, SceneLoadError> {
    let mut tiles = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            tiles.push(Tile::plain(generated_tile_kind(x, y, width, height)));
        }
    }
    let map = WorldMap::new(width, height, tiles)?;

    let center = GridPos {
        x: width / 2,
        y: height / 2,
    };
    let npc_at = |dx: i64, dy: i64| GridPos {
        x: map.wrap_x(i64::from(center.x) + dx),
        y: map.wrap_y(i64::from(center.y) + dy),
    };
    let actors = vec![
        Actor::new(ActorKind::Player, center, Facing::Down),
        Actor::new(
            ActorKind::Npc {
                gender: Gender::Female,
            },
            npc_at(2, 1),
            Facing::Left,
        ),
        Actor::new(
            ActorKind::Npc {
                gender: Gender::Male,
            },
            npc_at(-3, 2),
            Facing::Right,
        ),
        Actor::new(
            ActorKind::Npc {
                gender: Gender::Female,
            },
            npc_at(1, -4),
            Facing::Down,
        ),
    ];
    Ok(LoadedScene { map, actors })
}

fn generated_tile_kind(x: u32, y: u32, width: u32, height: u32) -> TileKind {
    let lake_x = width / 4;
    let lake_y = height / 4;
    let in_lake = x >= lake_x
        && x < lake_x + (width / 6).max(1)
        && y >= lake_y
        && y < lake_y + (height / 8).max(1);
    if in_lake {
        return TileKind::Water;
    }

    let hash = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
    if hash % 11 == 0 {
        TileKind::Tree
    } else {
        TileKind::Grass
    }
}
