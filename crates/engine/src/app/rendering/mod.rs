mod frame;
mod raster;
mod renderer;
mod transform;

pub use frame::{
    plan_frame, render_actors, render_background, BackgroundPass, DrawOp, DstRect, FramePlan,
    ScreenPos, SrcRect, WorldToScreen,
};
pub use raster::{blit_nearest, execute_plan, fill_rect};
pub use renderer::{compose_frame, RenderError, Renderer};
pub use transform::{compute_scale, compute_viewport_origin, ViewOrigin, ViewportSizing};
