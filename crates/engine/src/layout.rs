use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_TILE_SIZE: u32 = 16;
pub const DEFAULT_TILES_ACROSS: u32 = 16;
pub const DEFAULT_TILES_DOWN: u32 = 9;
pub const DEFAULT_WORLD_WIDTH: u32 = 64;
pub const DEFAULT_WORLD_HEIGHT: u32 = 64;
pub const DEFAULT_BUFFER_TILES: u32 = 1;

/// Fixed dimensions shared by the camera math, the frame planner and the renderer.
///
/// `base_tile_size` is the unscaled edge of one tile in source-image pixels.
/// `buffer_tiles` is the ring of off-screen tiles drawn around the view so the
/// sub-tile scroll offset never exposes an undrawn edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewLayout {
    pub base_tile_size: u32,
    pub tiles_across: u32,
    pub tiles_down: u32,
    pub world_width: u32,
    pub world_height: u32,
    pub buffer_tiles: u32,
}

impl Default for ViewLayout {
    fn default() -> Self {
        Self {
            base_tile_size: DEFAULT_BASE_TILE_SIZE,
            tiles_across: DEFAULT_TILES_ACROSS,
            tiles_down: DEFAULT_TILES_DOWN,
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            buffer_tiles: DEFAULT_BUFFER_TILES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout field `{field}` must be greater than zero")]
    ZeroDimension { field: &'static str },
}

impl ViewLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("base_tile_size", self.base_tile_size),
            ("tiles_across", self.tiles_across),
            ("tiles_down", self.tiles_down),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(LayoutError::ZeroDimension { field });
            }
        }
        Ok(())
    }

    pub fn with_world_size(self, world_width: u32, world_height: u32) -> Self {
        Self {
            world_width,
            world_height,
            ..self
        }
    }
}
