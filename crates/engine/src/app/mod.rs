mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod source;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, AppEvent, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    blit_nearest, compose_frame, compute_scale, compute_viewport_origin, execute_plan, fill_rect,
    plan_frame, render_actors, render_background, BackgroundPass, DrawOp, DstRect, FramePlan,
    RenderError, Renderer, ScreenPos, SrcRect, ViewOrigin, ViewportSizing, WorldToScreen,
};
pub use source::WorldSource;
