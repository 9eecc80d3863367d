//! Frame renderer backed by an EGL surface

use super::{FrameRenderer, TriangleScene};
use crate::config::{EglConfig, RenderConfig};
use crate::engine::EngineError;
use crate::gl::RendererInfo;
use crate::platform::{EglError, EglPlatform, NativeTarget};

/// Owns the EGL platform, the GL function table and the triangle scene
///
/// Must be created and used on one thread: the EGL context is current there.
pub struct EglRenderer {
    platform: EglPlatform,
    gl: glow::Context,
    scene: Option<TriangleScene>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for EglRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EglRenderer")
            .field("platform", &self.platform)
            .field("scene", &self.scene)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl EglRenderer {
    /// Initialize EGL on `target`, load GL and build the scene
    ///
    /// With `print_info` the GL and EGL identification strings are logged
    /// before the scene is built.
    pub fn new(
        target: NativeTarget,
        egl_config: &EglConfig,
        render_config: &RenderConfig,
        size: (u32, u32),
        print_info: bool,
    ) -> Result<Self, EngineError> {
        let platform = EglPlatform::initialize(target, egl_config)?;
        if let Some(interval) = render_config.swap_interval {
            platform.set_swap_interval(interval)?;
        }

        let gl = platform.load_gl();

        if print_info {
            RendererInfo::query(&gl).log();
            log::info!("EGL_VENDOR    = {}", platform.vendor().unwrap_or_default());
            let (major, minor) = platform.version();
            log::info!(
                "EGL_VERSION   = {} ({}.{})",
                platform.version_string().unwrap_or_default(),
                major,
                minor
            );
        }

        let scene = TriangleScene::new(&gl, render_config.clear_color)?;

        let mut renderer = Self {
            platform,
            gl,
            scene: Some(scene),
            width: size.0,
            height: size.1,
        };
        renderer.reshape(size.0, size.1);
        Ok(renderer)
    }
}

impl FrameRenderer for EglRenderer {
    type Error = EglError;

    fn reshape(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        TriangleScene::reshape(&self.gl, width, height);
    }

    fn render_frame(&mut self) -> Result<(), EglError> {
        if let Some(scene) = &self.scene {
            scene.draw(&self.gl, self.width, self.height);
        }
        self.platform.swap_buffers()
    }

    fn cleanup(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.destroy(&self.gl);
        }
        self.platform.terminate();
    }
}
