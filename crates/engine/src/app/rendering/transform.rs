use crate::actor::PixelPos;
use crate::layout::ViewLayout;

/// Largest integer magnification at which `tiles_across x tiles_down` base
/// tiles fit inside the window. Never below 1, so a window smaller than the
/// view crops instead of collapsing to nothing.
pub fn compute_scale(
    window_width: u32,
    window_height: u32,
    tiles_across: u32,
    tiles_down: u32,
    base_tile_size: u32,
) -> u32 {
    let tiles_across = tiles_across.max(1);
    let tiles_down = tiles_down.max(1);
    let base_tile_size = base_tile_size.max(1);
    let max_scale_across = window_width / tiles_across / base_tile_size;
    let max_scale_down = window_height / tiles_down / base_tile_size;
    max_scale_across.min(max_scale_down).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSizing {
    pub scale: u32,
    pub scaled_tile_size: u32,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl ViewportSizing {
    pub fn for_window(layout: &ViewLayout, window_width: u32, window_height: u32) -> Self {
        let scale = compute_scale(
            window_width,
            window_height,
            layout.tiles_across,
            layout.tiles_down,
            layout.base_tile_size,
        );
        let scaled_tile_size = scale * layout.base_tile_size;
        Self {
            scale,
            scaled_tile_size,
            surface_width: layout.tiles_across * scaled_tile_size,
            surface_height: layout.tiles_down * scaled_tile_size,
        }
    }
}

/// Top-left corner of the view in wrapped world pixels, split into a whole
/// tile index and the sub-tile remainder used for smooth scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOrigin {
    pub left_px: i64,
    pub top_px: i64,
    pub left_tile: i64,
    pub top_tile: i64,
    pub x_offset: i64,
    pub y_offset: i64,
}

pub fn compute_viewport_origin(
    anchor_location: PixelPos,
    tile_size: u32,
    tiles_across: u32,
    tiles_down: u32,
    world_width: u32,
    world_height: u32,
) -> ViewOrigin {
    let tile = i64::from(tile_size.max(1));
    let (left_px, left_tile, x_offset) =
        axis_origin(anchor_location.x, tile, tiles_across, world_width);
    let (top_px, top_tile, y_offset) =
        axis_origin(anchor_location.y, tile, tiles_down, world_height);
    ViewOrigin {
        left_px,
        top_px,
        left_tile,
        top_tile,
        x_offset,
        y_offset,
    }
}

fn axis_origin(anchor_px: i64, tile: i64, view_tiles: u32, world_tiles: u32) -> (i64, i64, i64) {
    let world_px = i64::from(world_tiles.max(1)) * tile;
    let view_px = i64::from(view_tiles) * tile;
    let center_shift = (view_px - tile).max(0) / 2;
    let origin_px = (anchor_px - center_shift).rem_euclid(world_px);
    (origin_px, origin_px / tile, origin_px % tile)
}
