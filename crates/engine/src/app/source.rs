use crate::actor::Actor;
use crate::world::WorldMap;

use super::InputSnapshot;

/// Supplies the world the runner draws each frame. The renderer only reads
/// through this trait; all state changes happen in `tick`.
pub trait WorldSource {
    fn map(&self) -> &WorldMap;

    /// Actor whose position centers the view.
    fn camera_anchor(&self) -> &Actor;

    /// Every actor to draw, in draw order. May include the camera anchor.
    fn actors(&self) -> &[Actor];

    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot);
}
