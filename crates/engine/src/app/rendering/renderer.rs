use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture, TextureError};
use thiserror::Error;
use tracing::{debug, info};
use winit::window::Window;

use crate::actor::Actor;
use crate::assets::{AssetCompletion, AssetGate, AssetKey, AssetTable, GateTransition};
use crate::layout::ViewLayout;
use crate::world::WorldMap;

use super::frame::{plan_frame, FramePlan};
use super::raster::{clear_frame, execute_plan, CLEAR_COLOR};
use super::transform::ViewportSizing;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create pixel surface: {0}")]
    Surface(#[source] pixels::Error),
    #[error("failed to resize pixel buffer: {0}")]
    Resize(#[source] TextureError),
    #[error("failed to present frame: {0}")]
    Present(#[source] pixels::Error),
}

/// Draws the visible part of the world into the window.
///
/// The pixel buffer always holds a whole number of scaled tiles; `pixels`
/// centers it inside the window surface. Nothing is drawn until every
/// required asset has reported in through the gate.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    layout: ViewLayout,
    sizing: ViewportSizing,
    assets: AssetTable,
    gate: AssetGate,
}

impl Renderer {
    pub fn new(window: Arc<Window>, layout: ViewLayout) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let sizing = ViewportSizing::for_window(&layout, size.width, size.height);
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            size.width.max(1),
            size.height.max(1),
            sizing,
        )?;
        info!(
            scale = sizing.scale,
            surface_width = sizing.surface_width,
            surface_height = sizing.surface_height,
            "viewport_initialized"
        );
        Ok(Self {
            window,
            pixels,
            layout,
            sizing,
            assets: AssetTable::default(),
            gate: AssetGate::new(),
        })
    }

    fn build_pixels(
        window: Arc<Window>,
        window_width: u32,
        window_height: u32,
        sizing: ViewportSizing,
    ) -> Result<Pixels<'static>, RenderError> {
        let surface = SurfaceTexture::new(window_width, window_height, window);
        Pixels::new(sizing.surface_width, sizing.surface_height, surface)
            .map_err(RenderError::Surface)
    }

    pub fn sizing(&self) -> ViewportSizing {
        self.sizing
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Recomputes the scale for a new window size. A zero-sized window
    /// (minimised) keeps the previous sizing.
    pub fn resize(&mut self, window_width: u32, window_height: u32) -> Result<(), RenderError> {
        if window_width == 0 || window_height == 0 {
            return Ok(());
        }
        self.pixels
            .resize_surface(window_width, window_height)
            .map_err(RenderError::Resize)?;

        let sizing = ViewportSizing::for_window(&self.layout, window_width, window_height);
        if sizing != self.sizing {
            self.pixels
                .resize_buffer(sizing.surface_width, sizing.surface_height)
                .map_err(RenderError::Resize)?;
            info!(
                window_width,
                window_height,
                scale = sizing.scale,
                surface_width = sizing.surface_width,
                surface_height = sizing.surface_height,
                "viewport_resized"
            );
            self.sizing = sizing;
        }
        Ok(())
    }

    pub fn begin_asset_loading(&mut self, keys: &[AssetKey]) -> GateTransition {
        self.gate.begin(keys)
    }

    /// Records one asset completion. Returns `Opened` exactly once, when the
    /// last outstanding asset has reported.
    pub fn on_asset_completion(&mut self, completion: AssetCompletion) -> GateTransition {
        record_completion(&mut self.gate, &mut self.assets, completion)
    }

    /// Draws one frame. A no-op until the asset gate is open.
    pub fn redraw(
        &mut self,
        map: &WorldMap,
        camera_anchor: &Actor,
        actors: &[Actor],
    ) -> Result<(), RenderError> {
        if !self.gate.is_ready() {
            return Ok(());
        }
        let sizing = self.sizing;
        let frame = self.pixels.frame_mut();
        compose_frame(
            frame,
            sizing,
            &self.layout,
            map,
            camera_anchor,
            actors,
            &self.assets,
        );
        self.pixels.render().map_err(RenderError::Present)
    }
}

/// Accounts for `completion` in the gate and keeps its sprite. Completions the
/// gate ignores leave the table untouched.
pub(crate) fn record_completion(
    gate: &mut AssetGate,
    assets: &mut AssetTable,
    completion: AssetCompletion,
) -> GateTransition {
    let AssetCompletion { key, result } = completion;
    match result {
        Ok(sprite) => {
            let transition = gate.mark_loaded(key);
            if transition != GateTransition::Ignored {
                debug!(
                    asset = %key,
                    width = sprite.width,
                    height = sprite.height,
                    "asset_loaded"
                );
                assets.insert(key, sprite);
            }
            transition
        }
        Err(error) => gate.mark_failed(key, &error.to_string()),
    }
}

/// Plans and rasterizes one frame into an RGBA8 buffer of
/// `sizing.surface_width x sizing.surface_height`.
pub fn compose_frame(
    frame: &mut [u8],
    sizing: ViewportSizing,
    layout: &ViewLayout,
    map: &WorldMap,
    camera_anchor: &Actor,
    actors: &[Actor],
    assets: &AssetTable,
) -> FramePlan {
    clear_frame(frame, CLEAR_COLOR);
    let plan = plan_frame(map, camera_anchor, actors, layout, sizing.scaled_tile_size);
    execute_plan(
        frame,
        sizing.surface_width,
        sizing.surface_height,
        &plan.ops,
        assets,
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorKind, Facing, Gender, GridPos};
    use crate::assets::{actor_asset_key, ActorSprite, AssetLoadError, Sprite};
    use crate::world::{Tile, TileKind};

    const GRASS: [u8; 4] = [0, 200, 0, 255];
    const PLAYER: [u8; 4] = [250, 250, 250, 255];
    const FEMALE: [u8; 4] = [255, 0, 255, 255];

    fn layout() -> ViewLayout {
        ViewLayout {
            base_tile_size: 4,
            tiles_across: 3,
            tiles_down: 3,
            world_width: 8,
            world_height: 8,
            buffer_tiles: 1,
        }
    }

    fn assets() -> AssetTable {
        let mut table = AssetTable::default();
        table.insert(AssetKey::Tile(TileKind::Grass), Sprite::solid(4, 4, GRASS));
        for facing in Facing::ALL {
            table.insert(
                AssetKey::Actor {
                    sprite: ActorSprite::Player,
                    facing,
                },
                Sprite::solid(4, 4, PLAYER),
            );
            table.insert(
                AssetKey::Actor {
                    sprite: ActorSprite::FemaleNpc,
                    facing,
                },
                Sprite::solid(4, 4, FEMALE),
            );
        }
        table
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn completions_fill_table_and_open_gate_once() {
        let mut gate = AssetGate::new();
        let mut table = AssetTable::default();
        let grass = AssetKey::Tile(TileKind::Grass);
        let water = AssetKey::Tile(TileKind::Water);
        gate.begin(&[grass, water]);

        let loaded = AssetCompletion {
            key: grass,
            result: Ok(Sprite::solid(1, 1, GRASS)),
        };
        assert_eq!(
            record_completion(&mut gate, &mut table, loaded),
            GateTransition::Pending
        );
        assert_eq!(table.get(grass), Some(&Sprite::solid(1, 1, GRASS)));

        let failed = AssetCompletion {
            key: water,
            result: Err(AssetLoadError::WorkerLost { key: water }),
        };
        assert_eq!(
            record_completion(&mut gate, &mut table, failed),
            GateTransition::Opened
        );
        assert!(gate.is_ready());
        assert!(table.get(water).is_none());
    }

    #[test]
    fn ignored_completion_does_not_replace_sprite() {
        let mut gate = AssetGate::new();
        let mut table = AssetTable::default();
        let grass = AssetKey::Tile(TileKind::Grass);
        gate.begin(&[grass]);
        record_completion(
            &mut gate,
            &mut table,
            AssetCompletion {
                key: grass,
                result: Ok(Sprite::solid(1, 1, GRASS)),
            },
        );

        let late = AssetCompletion {
            key: grass,
            result: Ok(Sprite::solid(2, 2, PLAYER)),
        };
        assert_eq!(
            record_completion(&mut gate, &mut table, late),
            GateTransition::Ignored
        );
        assert_eq!(table.get(grass), Some(&Sprite::solid(1, 1, GRASS)));

        let unknown = AssetKey::Tile(TileKind::Tree);
        let stray = AssetCompletion {
            key: unknown,
            result: Ok(Sprite::solid(1, 1, PLAYER)),
        };
        assert_eq!(
            record_completion(&mut gate, &mut table, stray),
            GateTransition::Ignored
        );
        assert!(table.get(unknown).is_none());
    }

    #[test]
    fn composed_frame_centers_anchor_and_fills_background() {
        let layout = layout();
        let sizing = ViewportSizing::for_window(&layout, 24, 24);
        assert_eq!(sizing.scale, 2);
        let map = WorldMap::filled(8, 8, Tile::plain(TileKind::Grass)).expect("map");
        let anchor = Actor::new(ActorKind::Player, GridPos { x: 4, y: 4 }, Facing::Down);
        let mut frame = vec![0u8; (sizing.surface_width * sizing.surface_height * 4) as usize];

        compose_frame(
            &mut frame,
            sizing,
            &layout,
            &map,
            &anchor,
            &[anchor],
            &assets(),
        );

        let w = sizing.surface_width;
        assert_eq!(pixel(&frame, w, 0, 0), GRASS);
        assert_eq!(pixel(&frame, w, 23, 23), GRASS);
        assert_eq!(pixel(&frame, w, 8, 8), PLAYER);
        assert_eq!(pixel(&frame, w, 15, 15), PLAYER);
        assert_eq!(pixel(&frame, w, 16, 15), GRASS);
    }

    #[test]
    fn later_actor_in_shared_cell_is_the_visible_one() {
        let layout = layout();
        let sizing = ViewportSizing::for_window(&layout, 12, 12);
        let map = WorldMap::filled(8, 8, Tile::plain(TileKind::Grass)).expect("map");
        let anchor = Actor::new(ActorKind::Player, GridPos { x: 2, y: 2 }, Facing::Down);
        let npc = Actor::new(
            ActorKind::Npc {
                gender: Gender::Female,
            },
            GridPos { x: 2, y: 2 },
            Facing::Left,
        );
        let mut frame = vec![0u8; (sizing.surface_width * sizing.surface_height * 4) as usize];

        compose_frame(
            &mut frame,
            sizing,
            &layout,
            &map,
            &anchor,
            &[anchor, npc],
            &assets(),
        );
        assert_eq!(pixel(&frame, sizing.surface_width, 5, 5), FEMALE);

        compose_frame(
            &mut frame,
            sizing,
            &layout,
            &map,
            &anchor,
            &[npc, anchor],
            &assets(),
        );
        assert_eq!(pixel(&frame, sizing.surface_width, 5, 5), PLAYER);
    }

    #[test]
    fn unavailable_tile_image_uses_placeholder() {
        let layout = layout();
        let sizing = ViewportSizing::for_window(&layout, 12, 12);
        let map = WorldMap::filled(8, 8, Tile::plain(TileKind::Water)).expect("map");
        let anchor = Actor::new(ActorKind::Player, GridPos { x: 0, y: 0 }, Facing::Down);
        let mut frame = vec![0u8; (sizing.surface_width * sizing.surface_height * 4) as usize];

        compose_frame(&mut frame, sizing, &layout, &map, &anchor, &[], &assets());
        assert_eq!(
            pixel(&frame, sizing.surface_width, 0, 0),
            AssetKey::Tile(TileKind::Water).placeholder_color()
        );
        assert_eq!(
            pixel(&frame, sizing.surface_width, 5, 5),
            AssetKey::Tile(TileKind::Water).placeholder_color()
        );
    }

    #[test]
    fn composing_twice_yields_identical_pixels() {
        let layout = layout();
        let sizing = ViewportSizing::for_window(&layout, 40, 30);
        let map = WorldMap::filled(8, 8, Tile::plain(TileKind::Grass)).expect("map");
        let mut anchor = Actor::new(ActorKind::Player, GridPos { x: 7, y: 0 }, Facing::Down);
        anchor.step(Facing::Right, &map);
        anchor.step_remaining = 0.3;
        let npc = Actor::new(
            ActorKind::Npc {
                gender: Gender::Male,
            },
            GridPos { x: 1, y: 7 },
            Facing::Up,
        );
        assert_eq!(
            actor_asset_key(npc.kind, npc.facing),
            AssetKey::Actor {
                sprite: ActorSprite::Player,
                facing: Facing::Up
            }
        );

        let len = (sizing.surface_width * sizing.surface_height * 4) as usize;
        let mut first = vec![0u8; len];
        let mut second = vec![0u8; len];
        let plan_a = compose_frame(
            &mut first,
            sizing,
            &layout,
            &map,
            &anchor,
            &[anchor, npc],
            &assets(),
        );
        let plan_b = compose_frame(
            &mut second,
            sizing,
            &layout,
            &map,
            &anchor,
            &[anchor, npc],
            &assets(),
        );
        assert_eq!(plan_a, plan_b);
        assert_eq!(first, second);
    }
}
