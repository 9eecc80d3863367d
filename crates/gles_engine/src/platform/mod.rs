//! EGL platform layer
//!
//! Binds a native display/window pair to an EGL display, surface and context
//! and makes them current on the calling thread.
//!
//! # Targets
//!
//! - **Xorg**: the Xlib display and window of a glfw window created without a
//!   client API, so EGL is the only context owner.
//! - **Framebuffer**: `EGL_DEFAULT_DISPLAY` with a null native window. Embedded
//!   drivers that scan out directly to the framebuffer accept this pair.
//!
//! Native handles travel as plain integers so the target can be handed to the
//! render thread that owns the context.

pub mod attributes;
pub mod context;

pub use attributes::{config_attributes, context_attributes};
pub use context::{EglError, EglPlatform, EglResult};

/// Native display/window pair an EGL surface is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeTarget {
    /// Xlib `Display*` and X window id
    Xlib {
        /// Address of the Xlib `Display`
        display: usize,
        /// X11 window id
        window: u64,
    },
    /// Default EGL display presenting straight to the framebuffer
    Framebuffer,
}

impl NativeTarget {
    /// Short name for log output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Xlib { .. } => "xorg",
            Self::Framebuffer => "framebuffer",
        }
    }
}
