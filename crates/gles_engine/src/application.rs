//! Application events seen by the main thread

/// Window events the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Framebuffer was resized
    WindowResized {
        /// New framebuffer width
        width: u32,
        /// New framebuffer height
        height: u32,
    },

    /// Window close requested (close button or Escape)
    WindowCloseRequested,

    /// Window was minimized; rendering is paused
    WindowMinimized,

    /// Window was restored from minimized state
    WindowRestored,
}

/// What the main loop should do with the render thread after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Nothing to forward
    Continue,
    /// Forward a new viewport size
    Resize(u32, u32),
    /// Stop presenting frames
    Pause,
    /// Start presenting frames again
    Resume,
    /// Shut down
    Exit,
}

impl AppEvent {
    /// Map an event to the render loop command it implies
    pub fn action(self) -> LoopAction {
        match self {
            Self::WindowResized { width, height } if width > 0 && height > 0 => {
                LoopAction::Resize(width, height)
            }
            // Zero-sized framebuffers show up while minimizing
            Self::WindowResized { .. } => LoopAction::Continue,
            Self::WindowCloseRequested => LoopAction::Exit,
            Self::WindowMinimized => LoopAction::Pause,
            Self::WindowRestored => LoopAction::Resume,
        }
    }
}
