//! Window management using GLFW
//!
//! The window is created without a client API: EGL owns the rendering
//! context, glfw only provides the native X11 window and its event queue.

use crate::application::AppEvent;
use crate::config::WindowConfig;
use crate::platform::NativeTarget;
use glfw::{Action, Key, WindowEvent};
use raw_window_handle::{
    HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle,
};
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `glfwInit` failed (no display connection, missing libraries)
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// `glfwCreateWindow` returned no window
    #[error("Window creation failed")]
    CreationFailed,

    /// The window is not backed by Xlib
    #[error("Unsupported native window: {0}")]
    UnsupportedPlatform(String),

    /// glfw could not hand out a native handle
    #[error("Native handle unavailable: {0}")]
    Handle(#[from] HandleError),
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window wrapper with proper resource management
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("framebuffer_size", &self.framebuffer_size())
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Create and show a window
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{:?}", e)))?;

        // EGL creates the context, not GLFW
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_iconify_polling(true);

        log::info!("Created {}x{} window \"{}\"", config.width, config.height, config.title);

        Ok(Self {
            glfw,
            window,
            events,
        })
    }

    /// Native handles EGL needs to create a window surface
    pub fn native_target(&self) -> WindowResult<NativeTarget> {
        let display = self.window.display_handle()?.as_raw();
        let window = self.window.window_handle()?.as_raw();
        target_from_raw(display, window)
    }

    /// Whether the window has been asked to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Block until events arrive or `timeout` seconds pass
    pub fn wait_events_timeout(&mut self, timeout: f64) {
        self.glfw.wait_events_timeout(timeout);
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Drain queued events and translate the ones the engine cares about
    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        let mut translated = Vec::new();
        for (_, event) in glfw::flush_messages(&self.events) {
            if let Some(app_event) = translate_event(&event) {
                translated.push(app_event);
            }
        }
        if translated.contains(&AppEvent::WindowCloseRequested) {
            self.window.set_should_close(true);
        }
        translated
    }
}

/// Map raw handles onto the Xlib pair EGL takes
fn target_from_raw(
    display: RawDisplayHandle,
    window: RawWindowHandle,
) -> WindowResult<NativeTarget> {
    match (display, window) {
        (RawDisplayHandle::Xlib(display), RawWindowHandle::Xlib(window)) => {
            let display = display.display.ok_or_else(|| {
                WindowError::UnsupportedPlatform("Xlib window without a display".to_string())
            })?;
            Ok(NativeTarget::Xlib {
                display: display.as_ptr() as usize,
                window: u64::from(window.window),
            })
        }
        (_, other) => Err(WindowError::UnsupportedPlatform(format!("{:?}", other))),
    }
}

fn translate_event(event: &WindowEvent) -> Option<AppEvent> {
    match *event {
        WindowEvent::FramebufferSize(width, height) => Some(AppEvent::WindowResized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
            Some(AppEvent::WindowCloseRequested)
        }
        WindowEvent::Iconify(true) => Some(AppEvent::WindowMinimized),
        WindowEvent::Iconify(false) => Some(AppEvent::WindowRestored),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{
        WaylandDisplayHandle, WaylandWindowHandle, XlibDisplayHandle, XlibWindowHandle,
    };
    use std::ffi::c_void;
    use std::ptr::NonNull;

    #[test]
    fn test_xlib_handles_become_target() {
        let mut fake_display = 0u8;
        let display_ptr = NonNull::from(&mut fake_display).cast::<c_void>();
        let display = RawDisplayHandle::Xlib(XlibDisplayHandle::new(Some(display_ptr), 0));
        let window = RawWindowHandle::Xlib(XlibWindowHandle::new(0x0040_0007));

        match target_from_raw(display, window).unwrap() {
            NativeTarget::Xlib { display, window } => {
                assert_eq!(display, display_ptr.as_ptr() as usize);
                assert_eq!(window, 0x0040_0007);
            }
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_xlib_without_display_rejected() {
        let display = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
        let window = RawWindowHandle::Xlib(XlibWindowHandle::new(7));
        assert!(matches!(
            target_from_raw(display, window),
            Err(WindowError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_wayland_handles_rejected() {
        let mut fake = 0u8;
        let ptr = NonNull::from(&mut fake).cast::<c_void>();
        let display = RawDisplayHandle::Wayland(WaylandDisplayHandle::new(ptr));
        let window = RawWindowHandle::Wayland(WaylandWindowHandle::new(ptr));
        assert!(matches!(
            target_from_raw(display, window),
            Err(WindowError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_translate_framebuffer_size() {
        let event = WindowEvent::FramebufferSize(1024, 768);
        assert_eq!(
            translate_event(&event),
            Some(AppEvent::WindowResized { width: 1024, height: 768 })
        );
    }

    #[test]
    fn test_translate_escape_and_close() {
        let escape = WindowEvent::Key(Key::Escape, 9, Action::Press, glfw::Modifiers::empty());
        assert_eq!(translate_event(&escape), Some(AppEvent::WindowCloseRequested));
        assert_eq!(translate_event(&WindowEvent::Close), Some(AppEvent::WindowCloseRequested));
    }

    #[test]
    fn test_translate_ignores_other_keys() {
        let release = WindowEvent::Key(Key::Escape, 9, Action::Release, glfw::Modifiers::empty());
        let space = WindowEvent::Key(Key::Space, 65, Action::Press, glfw::Modifiers::empty());
        assert_eq!(translate_event(&release), None);
        assert_eq!(translate_event(&space), None);
    }

    #[test]
    fn test_translate_iconify() {
        assert_eq!(translate_event(&WindowEvent::Iconify(true)), Some(AppEvent::WindowMinimized));
        assert_eq!(translate_event(&WindowEvent::Iconify(false)), Some(AppEvent::WindowRestored));
    }
}
