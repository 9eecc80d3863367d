//! The static RGB triangle

use crate::gl::{self, ArrayBuffer, ShaderError, ShaderProgram};
use glow::HasContext;

/// Vertex shader: passes position and color through
pub const VERTEX_SHADER: &str = include_str!("../../resources/shaders/triangle.vert");

/// Fragment shader: writes the interpolated color
pub const FRAGMENT_SHADER: &str = include_str!("../../resources/shaders/triangle.frag");

/// Homogeneous positions of the three corners
#[rustfmt::skip]
pub const VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.0, 1.0,
     0.5, -0.5, 0.0, 1.0,
     0.0,  0.5, 0.0, 1.0,
];

/// Red, green and blue corners
#[rustfmt::skip]
pub const COLORS: [f32; 12] = [
    1.0, 0.0, 0.0, 1.0,
    0.0, 1.0, 0.0, 1.0,
    0.0, 0.0, 1.0, 1.0,
];

const COMPONENTS: i32 = 4;

/// GPU objects for the triangle: program, attribute locations, buffers
#[derive(Debug)]
pub struct TriangleScene {
    program: ShaderProgram<glow::NativeProgram>,
    attr_pos: u32,
    attr_color: u32,
    vertices: ArrayBuffer,
    colors: ArrayBuffer,
}

impl TriangleScene {
    /// Build the program, upload both buffers and set the clear color
    pub fn new(gl: &glow::Context, clear_color: [f32; 4]) -> Result<Self, ShaderError> {
        let program = ShaderProgram::from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;

        // SAFETY: all calls below need only the context current on this thread.
        unsafe { gl.use_program(Some(program.handle())) };
        gl::check(gl);

        let attr_pos = Self::attribute(gl, program, "pos")?;
        let attr_color = Self::attribute(gl, program, "color")?;

        let vertices =
            ArrayBuffer::new_static(gl, &VERTICES, COMPONENTS).map_err(ShaderError::Create)?;
        let colors =
            ArrayBuffer::new_static(gl, &COLORS, COMPONENTS).map_err(ShaderError::Create)?;

        unsafe {
            gl.enable_vertex_attrib_array(attr_pos);
            gl.enable_vertex_attrib_array(attr_color);
            let [r, g, b, a] = clear_color;
            gl.clear_color(r, g, b, a);
        }
        gl::check(gl);

        log::debug!("Triangle scene ready (pos = {}, color = {})", attr_pos, attr_color);

        Ok(Self {
            program,
            attr_pos,
            attr_color,
            vertices,
            colors,
        })
    }

    fn attribute(
        gl: &glow::Context,
        program: ShaderProgram<glow::NativeProgram>,
        name: &str,
    ) -> Result<u32, ShaderError> {
        unsafe { gl.get_attrib_location(program.handle(), name) }
            .ok_or_else(|| ShaderError::MissingAttribute(name.to_string()))
    }

    /// Draw one frame into a `width` x `height` viewport
    pub fn draw(&self, gl: &glow::Context, width: u32, height: u32) {
        unsafe {
            gl.viewport(0, 0, to_gl_size(width), to_gl_size(height));
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        self.vertices.bind_to_attribute(gl, self.attr_pos);
        self.colors.bind_to_attribute(gl, self.attr_color);
        unsafe {
            gl.draw_arrays(glow::TRIANGLES, 0, self.vertices.vertex_count());
            gl.flush();
            gl.finish();
        }
        gl::check(gl);
    }

    /// Set the viewport without drawing
    pub fn reshape(gl: &glow::Context, width: u32, height: u32) {
        unsafe { gl.viewport(0, 0, to_gl_size(width), to_gl_size(height)) };
    }

    /// Release the program and buffers
    pub fn destroy(self, gl: &glow::Context) {
        unsafe {
            gl.disable_vertex_attrib_array(self.attr_pos);
            gl.disable_vertex_attrib_array(self.attr_color);
            gl.use_program(None);
        }
        self.vertices.delete(gl);
        self.colors.delete(gl);
        self.program.delete(gl);
    }
}

fn to_gl_size(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_is_three_vec4() {
        assert_eq!(VERTICES.len(), 3 * COMPONENTS as usize);
        assert_eq!(COLORS.len(), VERTICES.len());
        // Every position is homogeneous with w = 1 and every color is opaque
        assert!(VERTICES.chunks(4).all(|v| v[3] == 1.0));
        assert!(COLORS.chunks(4).all(|c| c[3] == 1.0));
    }

    #[test]
    fn test_shader_sources_agree_on_interface() {
        assert!(VERTEX_SHADER.contains("attribute vec4 pos;"));
        assert!(VERTEX_SHADER.contains("attribute vec4 color;"));
        assert!(VERTEX_SHADER.contains("varying lowp vec4 v_color;"));
        assert!(FRAGMENT_SHADER.contains("varying lowp vec4 v_color;"));
        assert!(FRAGMENT_SHADER.contains("gl_FragColor = v_color;"));
    }

    #[test]
    fn test_gl_size_saturates() {
        assert_eq!(to_gl_size(640), 640);
        assert_eq!(to_gl_size(u32::MAX), i32::MAX);
    }
}
