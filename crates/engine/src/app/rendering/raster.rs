use crate::assets::{AssetTable, Sprite};

use super::frame::{DrawOp, DstRect, SrcRect};

pub const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];

pub fn clear_frame(frame: &mut [u8], color: [u8; 4]) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

/// Applies `ops` in order to an RGBA8 frame. Ops whose image is missing or
/// malformed are drawn as a solid block in the asset's placeholder colour.
pub fn execute_plan(
    frame: &mut [u8],
    width: u32,
    height: u32,
    ops: &[DrawOp],
    assets: &AssetTable,
) {
    for op in ops {
        match assets.get(op.asset).filter(|sprite| sprite.is_well_formed()) {
            Some(sprite) => {
                let src = op.src.unwrap_or(SrcRect {
                    x: 0,
                    y: 0,
                    width: sprite.width,
                    height: sprite.height,
                });
                blit_nearest(frame, width, height, sprite, src, op.dst);
            }
            None => fill_rect(frame, width, height, op.dst, op.asset.placeholder_color()),
        }
    }
}

/// Copies `src` from `sprite` into `dst`, scaling with nearest-neighbour
/// sampling. Fully transparent source pixels are skipped; everything is
/// clipped to the frame.
pub fn blit_nearest(
    frame: &mut [u8],
    width: u32,
    height: u32,
    sprite: &Sprite,
    src: SrcRect,
    dst: DstRect,
) {
    if !sprite.is_well_formed() || !frame_fits(frame, width, height) {
        return;
    }
    if src.width == 0 || src.height == 0 || dst.width == 0 || dst.height == 0 {
        return;
    }
    if src.x >= sprite.width || src.y >= sprite.height {
        return;
    }
    let Some((left, top, right, bottom)) = clip_to_frame(dst, width, height) else {
        return;
    };

    let frame_width = width as usize;
    let sprite_width = sprite.width as usize;
    let src_w = i64::from(src.width);
    let src_h = i64::from(src.height);
    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);

    for out_y in top..bottom {
        let dy = out_y - dst.y;
        let src_y = u32::try_from(dy * src_h / dst_h).unwrap_or(0);
        let src_y = (src.y + src_y).min(sprite.height - 1) as usize;
        let src_row_offset = src_y * sprite_width * 4;
        let dst_row_offset = out_y as usize * frame_width * 4;

        for out_x in left..right {
            let dx = out_x - dst.x;
            let src_x = u32::try_from(dx * src_w / dst_w).unwrap_or(0);
            let src_x = (src.x + src_x).min(sprite.width - 1) as usize;
            let src_offset = src_row_offset + src_x * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            frame[dst_offset..dst_offset + 4]
                .copy_from_slice(&sprite.rgba[src_offset..src_offset + 4]);
        }
    }
}

pub fn fill_rect(frame: &mut [u8], width: u32, height: u32, dst: DstRect, color: [u8; 4]) {
    if !frame_fits(frame, width, height) {
        return;
    }
    let Some((left, top, right, bottom)) = clip_to_frame(dst, width, height) else {
        return;
    };
    let frame_width = width as usize;
    for y in top..bottom {
        let row = y as usize * frame_width * 4;
        for x in left..right {
            let offset = row + x as usize * 4;
            frame[offset..offset + 4].copy_from_slice(&color);
        }
    }
}

fn frame_fits(frame: &[u8], width: u32, height: u32) -> bool {
    width > 0 && height > 0 && frame.len() >= width as usize * height as usize * 4
}

fn clip_to_frame(dst: DstRect, width: u32, height: u32) -> Option<(i64, i64, i64, i64)> {
    let left = dst.x.max(0);
    let top = dst.y.max(0);
    let right = (dst.x + i64::from(dst.width)).min(i64::from(width));
    let bottom = (dst.y + i64::from(dst.height)).min(i64::from(height));
    if left >= right || top >= bottom {
        return None;
    }
    Some((left, top, right, bottom))
}
