//! Rendering: the triangle scene, the EGL-backed frame renderer and the
//! fixed-rate render loop that drives it

pub mod render_loop;
pub mod renderer;
pub mod triangle;

pub use render_loop::{LoopStats, RenderLoop, RenderLoopError, RenderLoopHandle};
pub use renderer::EglRenderer;
pub use triangle::TriangleScene;

/// Something the render loop can drive, one frame per tick
pub trait FrameRenderer {
    /// Error returned when a frame cannot be presented
    type Error: std::fmt::Display;

    /// The drawable size changed
    fn reshape(&mut self, width: u32, height: u32);

    /// Draw and present one frame
    fn render_frame(&mut self) -> Result<(), Self::Error>;

    /// Release graphics resources; called exactly once when the loop ends
    fn cleanup(&mut self);
}
