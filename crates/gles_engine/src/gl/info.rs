//! Renderer identification strings

use glow::HasContext;

/// `glGetString` results for the current context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererInfo {
    /// `GL_RENDERER`
    pub renderer: String,
    /// `GL_VERSION`
    pub version: String,
    /// `GL_VENDOR`
    pub vendor: String,
    /// `GL_EXTENSIONS`
    pub extensions: String,
}

impl RendererInfo {
    /// Query the current context
    pub fn query(gl: &glow::Context) -> Self {
        // SAFETY: glGetString needs only a current context.
        unsafe {
            Self {
                renderer: gl.get_parameter_string(glow::RENDERER),
                version: gl.get_parameter_string(glow::VERSION),
                vendor: gl.get_parameter_string(glow::VENDOR),
                extensions: gl.get_parameter_string(glow::EXTENSIONS),
            }
        }
    }

    /// The four `NAME = value` lines, padded so the values line up
    pub fn lines(&self) -> [String; 4] {
        [
            format!("GL_RENDERER   = {}", self.renderer),
            format!("GL_VERSION    = {}", self.version),
            format!("GL_VENDOR     = {}", self.vendor),
            format!("GL_EXTENSIONS = {}", self.extensions),
        ]
    }

    /// Write the strings to the log
    pub fn log(&self) {
        for line in self.lines() {
            log::info!("{}", line);
        }
    }
}
