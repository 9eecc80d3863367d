//! OpenGL ES 2 helpers on top of `glow`
//!
//! Every wrapper checks `glGetError` after the calls it issues. A non-zero
//! error code is a programming or driver fault, so it panics instead of
//! returning an error.

pub mod buffer;
pub mod info;
pub mod shader;

pub use buffer::ArrayBuffer;
pub use info::RendererInfo;
pub use shader::{ShaderApi, ShaderError, ShaderProgram, ShaderStage};

use glow::HasContext;

/// Panic if the GL error flag is set
pub fn check(gl: &glow::Context) {
    // SAFETY: glGetError has no preconditions beyond a current context.
    let code = unsafe { gl.get_error() };
    panic_on_error(code);
}

/// Panic with the GL error code unless it is `GL_NO_ERROR`
pub fn panic_on_error(code: u32) {
    if code != glow::NO_ERROR {
        panic!("An error occurred! Code: 0x{:x}", code);
    }
}
