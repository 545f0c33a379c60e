use std::collections::HashMap;

use crate::actor::{Actor, GridPos};
use crate::assets::{actor_asset_key, AssetKey};
use crate::layout::ViewLayout;
use crate::world::WorldMap;

use super::transform::{compute_viewport_origin, ViewOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPos {
    pub x: i64,
    pub y: i64,
}

/// One image blit. `src: None` draws the whole image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOp {
    pub asset: AssetKey,
    pub src: Option<SrcRect>,
    pub dst: DstRect,
}

/// Screen origin of every world cell drawn this frame. Rebuilt per frame.
pub type WorldToScreen = HashMap<GridPos, ScreenPos>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundPass {
    pub ops: Vec<DrawOp>,
    pub world_to_screen: WorldToScreen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlan {
    pub origin: ViewOrigin,
    pub ops: Vec<DrawOp>,
    pub background_ops: usize,
}

pub fn render_background(
    map: &WorldMap,
    origin: &ViewOrigin,
    layout: &ViewLayout,
    tile_size: u32,
) -> BackgroundPass {
    let buffer = i64::from(layout.buffer_tiles);
    let tile = i64::from(tile_size);
    let columns = i64::from(layout.tiles_across) + 2 * buffer;
    let rows = i64::from(layout.tiles_down) + 2 * buffer;
    let mut ops = Vec::with_capacity((columns * rows).max(0) as usize);
    let mut world_to_screen = HashMap::with_capacity(ops.capacity());

    for screen_y in -buffer..i64::from(layout.tiles_down) + buffer {
        for screen_x in -buffer..i64::from(layout.tiles_across) + buffer {
            let cell = GridPos {
                x: map.wrap_x(origin.left_tile + screen_x),
                y: map.wrap_y(origin.top_tile + screen_y),
            };
            debug_assert!(cell.x < map.width() && cell.y < map.height());
            let Some(tile_def) = map.tile_at(cell.x, cell.y) else {
                continue;
            };

            let screen = ScreenPos {
                x: screen_x * tile - origin.x_offset,
                y: screen_y * tile - origin.y_offset,
            };
            let src = tile_def.sub_image.map(|sub| SrcRect {
                x: sub.sx,
                y: sub.sy,
                width: layout.base_tile_size,
                height: layout.base_tile_size,
            });
            ops.push(DrawOp {
                asset: AssetKey::Tile(tile_def.kind),
                src,
                dst: DstRect {
                    x: screen.x,
                    y: screen.y,
                    width: tile_size,
                    height: tile_size,
                },
            });
            world_to_screen.insert(cell, screen);
        }
    }

    BackgroundPass {
        ops,
        world_to_screen,
    }
}

/// Draws actors in list order on top of the background. Actors whose cell
/// was not drawn this frame are off-screen and skipped.
pub fn render_actors(
    actors: &[Actor],
    world_to_screen: &WorldToScreen,
    tile_size: u32,
) -> Vec<DrawOp> {
    let tile = i64::from(tile_size);
    actors
        .iter()
        .filter_map(|actor| {
            let cell_origin = world_to_screen.get(&actor.grid)?;
            let location = actor.location(tile_size);
            let offset_x = i64::from(actor.grid.x) * tile - location.x;
            let offset_y = i64::from(actor.grid.y) * tile - location.y;
            Some(DrawOp {
                asset: actor_asset_key(actor.kind, actor.facing),
                src: None,
                dst: DstRect {
                    x: cell_origin.x - offset_x,
                    y: cell_origin.y - offset_y,
                    width: tile_size,
                    height: tile_size,
                },
            })
        })
        .collect()
}

pub fn plan_frame(
    map: &WorldMap,
    camera_anchor: &Actor,
    actors: &[Actor],
    layout: &ViewLayout,
    tile_size: u32,
) -> FramePlan {
    let origin = compute_viewport_origin(
        camera_anchor.location(tile_size),
        tile_size,
        layout.tiles_across,
        layout.tiles_down,
        map.width(),
        map.height(),
    );
    let background = render_background(map, &origin, layout, tile_size);
    let background_ops = background.ops.len();
    let mut ops = background.ops;
    ops.extend(render_actors(actors, &background.world_to_screen, tile_size));
    FramePlan {
        origin,
        ops,
        background_ops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorKind, Facing, Gender};
    use crate::assets::ActorSprite;
    use crate::world::{SubImage, Tile, TileKind};

    fn small_layout(tiles: u32, world: u32) -> ViewLayout {
        ViewLayout {
            base_tile_size: 10,
            tiles_across: tiles,
            tiles_down: tiles,
            world_width: world,
            world_height: world,
            buffer_tiles: 1,
        }
    }

    fn numbered_world(width: u32, height: u32) -> WorldMap {
        let tiles = (0..width * height)
            .map(|index| Tile::plain(TileKind::ALL[(index % 3) as usize]))
            .collect();
        WorldMap::new(width, height, tiles).expect("world")
    }

    fn player_at(x: u32, y: u32) -> Actor {
        Actor::new(ActorKind::Player, GridPos { x, y }, Facing::Down)
    }

    #[test]
    fn background_covers_view_plus_buffer_ring() {
        let layout = small_layout(2, 8);
        let map = numbered_world(8, 8);
        let origin = compute_viewport_origin(player_at(4, 4).location(10), 10, 2, 2, 8, 8);
        let pass = render_background(&map, &origin, &layout, 10);
        assert_eq!(pass.ops.len(), 16);
        assert_eq!(pass.world_to_screen.len(), 16);

        let first = pass.ops[0];
        assert_eq!(first.dst.x, -10 - origin.x_offset);
        assert_eq!(first.dst.y, -10 - origin.y_offset);
        assert_eq!((first.dst.width, first.dst.height), (10, 10));
    }

    #[test]
    fn small_world_scenario_wraps_to_far_edge() {
        let layout = small_layout(2, 4);
        let map = numbered_world(4, 4);
        let anchor = player_at(0, 0);
        let plan = plan_frame(&map, &anchor, &[anchor], &layout, 10);
        assert_eq!(plan.origin.left_tile, 3);
        assert_eq!(plan.origin.top_tile, 3);

        let pass = render_background(&map, &plan.origin, &layout, 10);
        // Screen column 0 shows world column 3; the buffer column before it shows 2.
        assert_eq!(
            pass.world_to_screen.get(&GridPos { x: 3, y: 3 }),
            Some(&ScreenPos { x: -5, y: -5 })
        );
        assert_eq!(
            pass.world_to_screen.get(&GridPos { x: 0, y: 0 }),
            Some(&ScreenPos { x: 5, y: 5 })
        );
        assert_eq!(
            pass.world_to_screen.get(&GridPos { x: 2, y: 2 }),
            Some(&ScreenPos { x: -15, y: -15 })
        );
        assert_eq!(pass.world_to_screen.len(), 16);
    }

    #[test]
    fn sub_image_tiles_carry_source_region() {
        let layout = small_layout(1, 3);
        let mut map = WorldMap::filled(3, 3, Tile::plain(TileKind::Grass)).expect("world");
        map.set_tile(
            1,
            1,
            Tile {
                kind: TileKind::Tree,
                sub_image: Some(SubImage { sx: 20, sy: 30 }),
            },
        );
        let origin = compute_viewport_origin(player_at(1, 1).location(40), 40, 1, 1, 3, 3);
        let pass = render_background(&map, &origin, &layout, 40);

        let tree_ops: Vec<&DrawOp> = pass
            .ops
            .iter()
            .filter(|op| op.asset == AssetKey::Tile(TileKind::Tree))
            .collect();
        assert_eq!(tree_ops.len(), 1);
        assert_eq!(
            tree_ops[0].src,
            Some(SrcRect {
                x: 20,
                y: 30,
                width: 10,
                height: 10
            })
        );
        assert_eq!((tree_ops[0].dst.x, tree_ops[0].dst.y), (0, 0));
        assert_eq!((tree_ops[0].dst.width, tree_ops[0].dst.height), (40, 40));
        assert!(pass
            .ops
            .iter()
            .filter(|op| op.asset == AssetKey::Tile(TileKind::Grass))
            .all(|op| op.src.is_none()));
    }

    #[test]
    fn background_pass_is_idempotent() {
        let layout = small_layout(5, 9);
        let map = numbered_world(9, 7);
        let anchor = player_at(8, 0);
        let first = plan_frame(&map, &anchor, &[anchor], &layout, 16);
        let second = plan_frame(&map, &anchor, &[anchor], &layout, 16);
        assert_eq!(first, second);

        let origin = first.origin;
        assert_eq!(
            render_background(&map, &origin, &layout, 16),
            render_background(&map, &origin, &layout, 16)
        );
    }

    #[test]
    fn settled_anchor_draws_at_its_cell_origin() {
        let layout = small_layout(3, 10);
        let map = numbered_world(10, 10);
        let anchor = player_at(5, 5);
        let plan = plan_frame(&map, &anchor, &[anchor], &layout, 10);
        let actor_ops = &plan.ops[plan.background_ops..];
        assert_eq!(actor_ops.len(), 1);
        // 3x3 view centers the anchor in the middle tile.
        assert_eq!((actor_ops[0].dst.x, actor_ops[0].dst.y), (10, 10));
    }

    #[test]
    fn moving_anchor_stays_centered_while_background_scrolls() {
        let layout = small_layout(3, 10);
        let map = numbered_world(10, 10);
        let mut anchor = player_at(5, 5);
        anchor.step(Facing::Right, &map);
        anchor.step_remaining = 0.4;

        let plan = plan_frame(&map, &anchor, &[anchor], &layout, 10);
        let actor_op = plan.ops[plan.background_ops];
        assert_eq!((actor_op.dst.x, actor_op.dst.y), (10, 10));
        assert_eq!(plan.origin.x_offset, 6);
        assert_eq!(plan.origin.y_offset, 0);
    }

    #[test]
    fn mid_step_actor_is_drawn_between_cells() {
        let layout = small_layout(3, 10);
        let map = numbered_world(10, 10);
        let anchor = player_at(5, 5);
        let mut walker = Actor::new(
            ActorKind::Npc {
                gender: Gender::Female,
            },
            GridPos { x: 6, y: 5 },
            Facing::Right,
        );
        walker.step_remaining = 0.5;

        let plan = plan_frame(&map, &anchor, &[anchor, walker], &layout, 10);
        let walker_op = plan.ops[plan.background_ops + 1];
        assert_eq!((walker_op.dst.x, walker_op.dst.y), (15, 10));
        assert_eq!(
            walker_op.asset,
            AssetKey::Actor {
                sprite: ActorSprite::FemaleNpc,
                facing: Facing::Right
            }
        );
    }

    #[test]
    fn actor_outside_buffered_window_is_never_drawn() {
        let layout = small_layout(3, 32);
        let map = numbered_world(32, 32);
        let anchor = player_at(10, 10);
        let inside_buffer = player_at(8, 10);
        let outside = player_at(7, 10);
        let far = player_at(25, 3);

        let plan = plan_frame(
            &map,
            &anchor,
            &[anchor, inside_buffer, outside, far],
            &layout,
            10,
        );
        let actor_ops = &plan.ops[plan.background_ops..];
        assert_eq!(actor_ops.len(), 2);
        assert_eq!((actor_ops[1].dst.x, actor_ops[1].dst.y), (-10, 10));
    }

    #[test]
    fn actor_across_world_seam_is_drawn_next_to_anchor() {
        let layout = small_layout(3, 16);
        let map = numbered_world(16, 16);
        let anchor = player_at(0, 0);
        let neighbour = Actor::new(
            ActorKind::Npc {
                gender: Gender::Male,
            },
            GridPos { x: 15, y: 0 },
            Facing::Left,
        );
        let plan = plan_frame(&map, &anchor, &[anchor, neighbour], &layout, 10);
        let actor_ops = &plan.ops[plan.background_ops..];
        assert_eq!(actor_ops.len(), 2);
        assert_eq!((actor_ops[1].dst.x, actor_ops[1].dst.y), (0, 10));
    }

    #[test]
    fn actors_sharing_a_cell_draw_in_list_order() {
        let layout = small_layout(3, 10);
        let map = numbered_world(10, 10);
        let anchor = player_at(5, 5);
        let npc = Actor::new(
            ActorKind::Npc {
                gender: Gender::Female,
            },
            GridPos { x: 5, y: 5 },
            Facing::Up,
        );
        let plan = plan_frame(&map, &anchor, &[anchor, npc], &layout, 10);
        let actor_ops = &plan.ops[plan.background_ops..];
        assert_eq!(actor_ops.len(), 2);
        assert_eq!(actor_ops[0].dst, actor_ops[1].dst);
        assert_eq!(
            actor_ops[1].asset,
            AssetKey::Actor {
                sprite: ActorSprite::FemaleNpc,
                facing: Facing::Up
            }
        );
    }

    #[test]
    fn world_smaller_than_view_reuses_last_screen_slot() {
        let layout = small_layout(3, 2);
        let map = numbered_world(2, 2);
        let anchor = player_at(0, 0);
        let plan = plan_frame(&map, &anchor, &[anchor], &layout, 10);
        assert_eq!(plan.background_ops, 25);

        let pass = render_background(&map, &plan.origin, &layout, 10);
        assert_eq!(pass.world_to_screen.len(), 4);
        let last = pass.ops.last().expect("op");
        let last_cell = pass
            .world_to_screen
            .iter()
            .find(|(_, screen)| screen.x == last.dst.x && screen.y == last.dst.y);
        assert!(last_cell.is_some());
        assert_eq!(plan.ops.len(), 26);
    }
}
