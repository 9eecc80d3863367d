//! EGL display, surface and context ownership

use super::{attributes, NativeTarget};
use crate::config::EglConfig;
use khronos_egl as egl;
use thiserror::Error;

/// EGL setup and presentation errors
#[derive(Error, Debug)]
pub enum EglError {
    /// `eglGetDisplay` returned `EGL_NO_DISPLAY`
    #[error("No EGL display for the {0} target")]
    NoDisplay(&'static str),

    /// No config matched the requested attributes
    #[error("No EGL config matches the requested attributes")]
    NoMatchingConfig,

    /// An EGL call failed
    #[error("{call} failed: {source}")]
    Call {
        /// The EGL entry point
        call: &'static str,
        /// Error reported by `eglGetError`
        #[source]
        source: egl::Error,
    },
}

/// Result alias for EGL operations
pub type EglResult<T> = Result<T, EglError>;

trait CallContext<T> {
    fn call(self, call: &'static str) -> EglResult<T>;
}

impl<T> CallContext<T> for Result<T, egl::Error> {
    fn call(self, call: &'static str) -> EglResult<T> {
        self.map_err(|source| EglError::Call { call, source })
    }
}

struct Resources {
    display: egl::Display,
    surface: egl::Surface,
    context: egl::Context,
}

/// An initialized EGL display/surface/context triple, current on the thread
/// that created it
///
/// Resources are released by [`EglPlatform::terminate`] or on drop, whichever
/// comes first.
pub struct EglPlatform {
    egl: egl::Instance<egl::Static>,
    resources: Option<Resources>,
    version: (egl::Int, egl::Int),
}

impl std::fmt::Debug for EglPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EglPlatform")
            .field("version", &self.version)
            .field("terminated", &self.resources.is_none())
            .finish()
    }
}

impl EglPlatform {
    /// Create a surface for `target` and make a new context current on it
    pub fn initialize(target: NativeTarget, config: &EglConfig) -> EglResult<Self> {
        let egl = egl::Instance::new(egl::Static);

        let (native_display, native_window) = match target {
            NativeTarget::Xlib { display, window } => (
                display as egl::NativeDisplayType,
                window as usize as egl::NativeWindowType,
            ),
            NativeTarget::Framebuffer => (egl::DEFAULT_DISPLAY, std::ptr::null_mut()),
        };

        // SAFETY: the native display is either the default display or a live
        // Xlib connection owned by the window, which outlives the platform.
        let display = unsafe { egl.get_display(native_display) }
            .ok_or(EglError::NoDisplay(target.name()))?;

        let version = egl.initialize(display).call("eglInitialize")?;
        log::info!("EGL {}.{} initialized on the {} target", version.0, version.1, target.name());

        if let Err(source) = egl.bind_api(egl::OPENGL_ES_API) {
            let _ = egl.terminate(display);
            return Err(EglError::Call { call: "eglBindAPI", source });
        }

        match Self::create_resources(&egl, display, native_window, config) {
            Ok(resources) => Ok(Self {
                egl,
                resources: Some(resources),
                version,
            }),
            Err(e) => {
                let _ = egl.terminate(display);
                Err(e)
            }
        }
    }

    fn create_resources(
        egl: &egl::Instance<egl::Static>,
        display: egl::Display,
        native_window: egl::NativeWindowType,
        config: &EglConfig,
    ) -> EglResult<Resources> {
        let egl_config = egl
            .choose_first_config(display, &attributes::config_attributes(config))
            .call("eglChooseConfig")?
            .ok_or(EglError::NoMatchingConfig)?;

        // SAFETY: the native window handle stays valid until the surface is
        // destroyed in `terminate`.
        let surface = unsafe { egl.create_window_surface(display, egl_config, native_window, None) }
            .call("eglCreateWindowSurface")?;

        let context = match egl
            .create_context(display, egl_config, None, &attributes::context_attributes(config))
            .call("eglCreateContext")
        {
            Ok(context) => context,
            Err(e) => {
                let _ = egl.destroy_surface(display, surface);
                return Err(e);
            }
        };

        if let Err(e) = egl
            .make_current(display, Some(surface), Some(surface), Some(context))
            .call("eglMakeCurrent")
        {
            let _ = egl.destroy_context(display, context);
            let _ = egl.destroy_surface(display, surface);
            return Err(e);
        }

        log::debug!("EGL surface and OpenGL ES {} context created", config.client_version);

        Ok(Resources { display, surface, context })
    }

    /// EGL version reported by `eglInitialize`
    pub fn version(&self) -> (i32, i32) {
        self.version
    }

    /// `EGL_VENDOR` string
    pub fn vendor(&self) -> Option<String> {
        self.query_string(egl::VENDOR)
    }

    /// `EGL_VERSION` string
    pub fn version_string(&self) -> Option<String> {
        self.query_string(egl::VERSION)
    }

    fn query_string(&self, name: egl::Int) -> Option<String> {
        let resources = self.resources.as_ref()?;
        self.egl
            .query_string(Some(resources.display), name)
            .ok()
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Set the swap interval for the current surface
    pub fn set_swap_interval(&self, interval: i32) -> EglResult<()> {
        if let Some(resources) = &self.resources {
            self.egl
                .swap_interval(resources.display, interval)
                .call("eglSwapInterval")?;
        }
        Ok(())
    }

    /// Load OpenGL ES entry points through `eglGetProcAddress`
    pub fn load_gl(&self) -> glow::Context {
        // SAFETY: a context is current on this thread, so the returned entry
        // points belong to it.
        unsafe {
            glow::Context::from_loader_function(|name| {
                self.egl
                    .get_proc_address(name)
                    .map_or(std::ptr::null(), |f| f as *const std::ffi::c_void)
            })
        }
    }

    /// Present the back buffer
    pub fn swap_buffers(&self) -> EglResult<()> {
        match &self.resources {
            Some(resources) => self
                .egl
                .swap_buffers(resources.display, resources.surface)
                .call("eglSwapBuffers"),
            None => Ok(()),
        }
    }

    /// Destroy the surface and context and terminate the display
    pub fn terminate(&mut self) {
        let Some(resources) = self.resources.take() else {
            return;
        };

        let _ = self.egl.make_current(resources.display, None, None, None);
        if let Err(e) = self.egl.destroy_surface(resources.display, resources.surface) {
            log::warn!("eglDestroySurface failed: {}", e);
        }
        if let Err(e) = self.egl.destroy_context(resources.display, resources.context) {
            log::warn!("eglDestroyContext failed: {}", e);
        }
        if let Err(e) = self.egl.terminate(resources.display) {
            log::warn!("eglTerminate failed: {}", e);
        }
        log::debug!("EGL resources released");
    }
}

impl Drop for EglPlatform {
    fn drop(&mut self) {
        self.terminate();
    }
}
