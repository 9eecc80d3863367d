//! Static vertex attribute buffers

use glow::HasContext;

/// A `GL_ARRAY_BUFFER` filled once with `STATIC_DRAW` data
#[derive(Debug, Clone, Copy)]
pub struct ArrayBuffer {
    buffer: glow::NativeBuffer,
    components: i32,
    len: usize,
}

impl ArrayBuffer {
    /// Upload `data` as tightly packed vectors of `components` floats
    pub fn new_static(gl: &glow::Context, data: &[f32], components: i32) -> Result<Self, String> {
        // SAFETY: plain buffer object calls on the current context; the data
        // slice is copied by glBufferData before it returns.
        let buffer = unsafe { gl.create_buffer()? };
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
        }
        super::check(gl);

        log::debug!("Uploaded {} bytes to array buffer", std::mem::size_of_val(data));

        Ok(Self {
            buffer,
            components,
            len: data.len(),
        })
    }

    /// Bind the buffer and point `attribute` at it
    pub fn bind_to_attribute(&self, gl: &glow::Context, attribute: u32) {
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.buffer));
            gl.vertex_attrib_pointer_f32(attribute, self.components, glow::FLOAT, false, 0, 0);
        }
    }

    /// Number of complete vectors stored
    pub fn vertex_count(&self) -> i32 {
        vertex_count(self.len, self.components)
    }

    /// Release the GL buffer object
    pub fn delete(self, gl: &glow::Context) {
        unsafe { gl.delete_buffer(self.buffer) }
    }
}

fn vertex_count(len: usize, components: i32) -> i32 {
    match usize::try_from(components) {
        Ok(components) if components > 0 => i32::try_from(len / components).unwrap_or(i32::MAX),
        _ => 0,
    }
}
