use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::actor::{ActorKind, Facing, Gender};
use crate::world::TileKind;

const ACTOR_DIR: &str = "actors";
const BG_TILE_DIR: &str = "bgTiles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActorSprite {
    Player,
    FemaleNpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKey {
    Actor { sprite: ActorSprite, facing: Facing },
    Tile(TileKind),
}

impl AssetKey {
    /// Every image the renderer needs before it may draw: four facings for
    /// each actor sprite plus one image per background tile kind.
    pub const ALL: [AssetKey; 11] = [
        AssetKey::Actor {
            sprite: ActorSprite::Player,
            facing: Facing::Up,
        },
        AssetKey::Actor {
            sprite: ActorSprite::Player,
            facing: Facing::Down,
        },
        AssetKey::Actor {
            sprite: ActorSprite::Player,
            facing: Facing::Left,
        },
        AssetKey::Actor {
            sprite: ActorSprite::Player,
            facing: Facing::Right,
        },
        AssetKey::Actor {
            sprite: ActorSprite::FemaleNpc,
            facing: Facing::Up,
        },
        AssetKey::Actor {
            sprite: ActorSprite::FemaleNpc,
            facing: Facing::Down,
        },
        AssetKey::Actor {
            sprite: ActorSprite::FemaleNpc,
            facing: Facing::Left,
        },
        AssetKey::Actor {
            sprite: ActorSprite::FemaleNpc,
            facing: Facing::Right,
        },
        AssetKey::Tile(TileKind::Grass),
        AssetKey::Tile(TileKind::Tree),
        AssetKey::Tile(TileKind::Water),
    ];

    pub fn relative_path(self) -> String {
        match self {
            AssetKey::Actor {
                sprite: ActorSprite::Player,
                facing,
            } => format!("{ACTOR_DIR}/player/{}.png", facing.name()),
            AssetKey::Actor {
                sprite: ActorSprite::FemaleNpc,
                facing,
            } => format!("{ACTOR_DIR}/npcs/female/{}.png", facing.name()),
            AssetKey::Tile(kind) => format!("{BG_TILE_DIR}/{}.png", kind.name()),
        }
    }

    /// Solid colour drawn in place of the image when it failed to load.
    pub const fn placeholder_color(self) -> [u8; 4] {
        match self {
            AssetKey::Actor {
                sprite: ActorSprite::Player,
                ..
            } => [220, 220, 240, 255],
            AssetKey::Actor {
                sprite: ActorSprite::FemaleNpc,
                ..
            } => [232, 140, 190, 255],
            AssetKey::Tile(TileKind::Grass) => [74, 112, 56, 255],
            AssetKey::Tile(TileKind::Tree) => [34, 70, 30, 255],
            AssetKey::Tile(TileKind::Water) => [48, 86, 150, 255],
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Female NPCs use their own sheet; everyone else, the camera anchor
/// included, uses the player sheet.
pub fn actor_asset_key(kind: ActorKind, facing: Facing) -> AssetKey {
    let sprite = match kind {
        ActorKind::Npc {
            gender: Gender::Female,
        } => ActorSprite::FemaleNpc,
        ActorKind::Npc {
            gender: Gender::Male,
        }
        | ActorKind::Player => ActorSprite::Player,
    };
    AssetKey::Actor { sprite, facing }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("asset path must not be empty")]
    Empty,
    #[error("asset path must not start with '/'")]
    LeadingSlash,
    #[error("asset path must not contain '\\\\'")]
    Backslash,
    #[error("asset path must not contain '..'")]
    ParentTraversal,
    #[error("asset path contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_asset_path(path: &str) -> Result<(), AssetPathError> {
    if path.is_empty() {
        return Err(AssetPathError::Empty);
    }
    if path.starts_with('/') {
        return Err(AssetPathError::LeadingSlash);
    }
    if path.contains('\\') {
        return Err(AssetPathError::Backslash);
    }
    if path.contains("..") {
        return Err(AssetPathError::ParentTraversal);
    }
    for ch in path.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-' | '.') {
            continue;
        }
        return Err(AssetPathError::InvalidCharacter { character: ch });
    }
    Ok(())
}

pub(crate) fn resolve_asset_path(root: &Path, key: AssetKey) -> Result<PathBuf, AssetPathError> {
    let relative = key.relative_path();
    validate_asset_path(&relative)?;
    Ok(root.join(relative))
}
