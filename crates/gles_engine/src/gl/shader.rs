//! GLSL shader compilation and program linking
//!
//! The compile and link steps go through the [`ShaderApi`] trait so the status
//! checks can run against a mock without a GPU. `glow::Context` is the real
//! implementation.

use glow::HasContext;
use thiserror::Error;

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl ShaderStage {
    /// GL enum for `glCreateShader`
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// Shader and program errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShaderError {
    /// `glCreateShader` / `glCreateProgram` returned nothing
    #[error("Failed to create {0}")]
    Create(String),

    /// Compile status was zero
    #[error("{stage} shader failed to compile: {log}")]
    Compile {
        /// Stage that failed
        stage: ShaderStage,
        /// Shader info log
        log: String,
    },

    /// Link status was zero
    #[error("Program failed to link: {log}")]
    Link {
        /// Program info log
        log: String,
    },

    /// A vertex attribute is not active in the linked program
    #[error("Attribute `{0}` not found in program")]
    MissingAttribute(String),
}

/// The subset of GL used to build a shader program
pub trait ShaderApi {
    /// Shader object handle
    type Shader: Copy;
    /// Program object handle
    type Program: Copy;

    /// `glCreateShader`
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// `glShaderSource` followed by `glCompileShader`
    fn compile_source(&self, shader: Self::Shader, source: &str);
    /// `GL_COMPILE_STATUS`
    fn compile_status(&self, shader: Self::Shader) -> bool;
    /// `glGetShaderInfoLog`
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// `glDeleteShader`
    fn delete_shader(&self, shader: Self::Shader);

    /// `glCreateProgram`
    fn create_program(&self) -> Result<Self::Program, String>;
    /// `glAttachShader`
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `glLinkProgram`
    fn link_program(&self, program: Self::Program);
    /// `GL_LINK_STATUS`
    fn link_status(&self, program: Self::Program) -> bool;
    /// `glGetProgramInfoLog`
    fn program_info_log(&self, program: Self::Program) -> String;
    /// `glDeleteProgram`
    fn delete_program(&self, program: Self::Program);
}

impl ShaderApi for glow::Context {
    type Shader = <Self as HasContext>::Shader;
    type Program = <Self as HasContext>::Program;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        // SAFETY: every call in this impl needs only a current context, which
        // the owner of the `glow::Context` guarantees.
        let shader = unsafe { HasContext::create_shader(self, stage.gl_enum())? };
        super::check(self);
        Ok(shader)
    }

    fn compile_source(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.shader_source(shader, source);
            super::check(self);
            self.compile_shader(shader);
        }
        super::check(self);
    }

    fn compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        let program = unsafe { HasContext::create_program(self)? };
        super::check(self);
        Ok(program)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
        super::check(self);
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }
}

/// Compile one shader stage
///
/// A zero compile status deletes the shader and returns its info log.
pub fn compile_shader<A: ShaderApi>(
    api: &A,
    stage: ShaderStage,
    source: &str,
) -> Result<A::Shader, ShaderError> {
    let shader = api
        .create_shader(stage)
        .map_err(|e| ShaderError::Create(format!("{} shader: {}", stage, e)))?;
    api.compile_source(shader, source);

    if !api.compile_status(shader) {
        let log = api.shader_info_log(shader);
        api.delete_shader(shader);
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}

/// Link compiled shaders into a program
///
/// A zero link status deletes the program and returns its info log. The
/// shaders are left to the caller.
pub fn link_program<A: ShaderApi>(
    api: &A,
    shaders: &[A::Shader],
) -> Result<A::Program, ShaderError> {
    let program = api
        .create_program()
        .map_err(|e| ShaderError::Create(format!("program: {}", e)))?;
    for &shader in shaders {
        api.attach_shader(program, shader);
    }
    api.link_program(program);

    if !api.link_status(program) {
        let log = api.program_info_log(program);
        api.delete_program(program);
        return Err(ShaderError::Link { log });
    }
    Ok(program)
}

/// A linked vertex + fragment program
#[derive(Debug, Clone, Copy)]
pub struct ShaderProgram<P> {
    handle: P,
}

impl<P: Copy> ShaderProgram<P> {
    /// Compile both stages and link them
    ///
    /// Shader objects are deleted once linking is done, whether or not it
    /// succeeded; the program keeps them alive while it exists.
    pub fn from_sources<A>(api: &A, vertex: &str, fragment: &str) -> Result<Self, ShaderError>
    where
        A: ShaderApi<Program = P>,
    {
        let fragment_shader = compile_shader(api, ShaderStage::Fragment, fragment)?;
        let vertex_shader = match compile_shader(api, ShaderStage::Vertex, vertex) {
            Ok(shader) => shader,
            Err(e) => {
                api.delete_shader(fragment_shader);
                return Err(e);
            }
        };

        let linked = link_program(api, &[fragment_shader, vertex_shader]);
        api.delete_shader(fragment_shader);
        api.delete_shader(vertex_shader);

        linked.map(|handle| Self { handle })
    }

    /// Raw program handle
    pub fn handle(&self) -> P {
        self.handle
    }

    /// Delete the program
    pub fn delete<A>(self, api: &A)
    where
        A: ShaderApi<Program = P>,
    {
        api.delete_program(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MockApi {
        failing_stage: Option<ShaderStage>,
        fail_link: bool,
        next_id: Cell<u32>,
        stages: RefCell<Vec<(u32, ShaderStage)>>,
        attached: RefCell<Vec<(u32, u32)>>,
        deleted_shaders: RefCell<Vec<u32>>,
        deleted_programs: RefCell<Vec<u32>>,
    }

    impl MockApi {
        fn alloc(&self) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            id
        }

        fn stage_of(&self, shader: u32) -> ShaderStage {
            self.stages
                .borrow()
                .iter()
                .find(|(id, _)| *id == shader)
                .map(|(_, stage)| *stage)
                .expect("unknown shader")
        }
    }

    impl ShaderApi for MockApi {
        type Shader = u32;
        type Program = u32;

        fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
            let id = self.alloc();
            self.stages.borrow_mut().push((id, stage));
            Ok(id)
        }

        fn compile_source(&self, _shader: u32, _source: &str) {}

        fn compile_status(&self, shader: u32) -> bool {
            self.failing_stage != Some(self.stage_of(shader))
        }

        fn shader_info_log(&self, shader: u32) -> String {
            format!("0:1(1): error: syntax error in {}", self.stage_of(shader))
        }

        fn delete_shader(&self, shader: u32) {
            self.deleted_shaders.borrow_mut().push(shader);
        }

        fn create_program(&self) -> Result<u32, String> {
            Ok(self.alloc())
        }

        fn attach_shader(&self, program: u32, shader: u32) {
            self.attached.borrow_mut().push((program, shader));
        }

        fn link_program(&self, _program: u32) {}

        fn link_status(&self, _program: u32) -> bool {
            !self.fail_link
        }

        fn program_info_log(&self, _program: u32) -> String {
            "error: varying `v_color' not written".to_string()
        }

        fn delete_program(&self, program: u32) {
            self.deleted_programs.borrow_mut().push(program);
        }
    }

    #[test]
    fn test_compile_success_returns_shader() {
        let api = MockApi::default();
        let shader = compile_shader(&api, ShaderStage::Vertex, "void main() {}").unwrap();
        assert_eq!(api.stage_of(shader), ShaderStage::Vertex);
        assert!(api.deleted_shaders.borrow().is_empty());
    }

    #[test]
    fn test_compile_failure_reports_log_and_deletes() {
        let api = MockApi {
            failing_stage: Some(ShaderStage::Fragment),
            ..MockApi::default()
        };
        let err = compile_shader(&api, ShaderStage::Fragment, "broken").unwrap_err();
        assert_eq!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                log: "0:1(1): error: syntax error in fragment".to_string(),
            }
        );
        assert_eq!(api.deleted_shaders.borrow().len(), 1);
    }

    #[test]
    fn test_link_failure_reports_log_and_deletes_program() {
        let api = MockApi {
            fail_link: true,
            ..MockApi::default()
        };
        let err = link_program(&api, &[10, 11]).unwrap_err();
        assert!(matches!(err, ShaderError::Link { ref log } if log.contains("v_color")));
        assert_eq!(api.deleted_programs.borrow().len(), 1);
        assert_eq!(api.attached.borrow().len(), 2);
    }

    #[test]
    fn test_program_from_sources_success() {
        let api = MockApi::default();
        let program = ShaderProgram::from_sources(&api, "vsh", "fsh").unwrap();

        let attached: Vec<u32> = api.attached.borrow().iter().map(|&(_, s)| s).collect();
        assert_eq!(attached.len(), 2);
        assert!(attached.iter().all(|&s| s != program.handle()));

        // Shaders are released after a successful link
        let mut deleted = api.deleted_shaders.borrow().clone();
        deleted.sort_unstable();
        let mut expected = attached.clone();
        expected.sort_unstable();
        assert_eq!(deleted, expected);
        assert!(api.deleted_programs.borrow().is_empty());
    }

    #[test]
    fn test_program_vertex_failure_releases_fragment() {
        let api = MockApi {
            failing_stage: Some(ShaderStage::Vertex),
            ..MockApi::default()
        };
        let err = ShaderProgram::from_sources(&api, "broken", "fsh").unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
        // Both the failed vertex shader and the good fragment shader are gone
        assert_eq!(api.deleted_shaders.borrow().len(), 2);
        assert!(api.attached.borrow().is_empty());
    }

    #[test]
    fn test_program_link_failure_releases_everything() {
        let api = MockApi {
            fail_link: true,
            ..MockApi::default()
        };
        let result = ShaderProgram::from_sources(&api, "vsh", "fsh");
        assert!(matches!(result, Err(ShaderError::Link { .. })));
        assert_eq!(api.deleted_shaders.borrow().len(), 2);
        assert_eq!(api.deleted_programs.borrow().len(), 1);
    }

    #[test]
    fn test_delete_program() {
        let api = MockApi::default();
        let program = ShaderProgram::from_sources(&api, "vsh", "fsh").unwrap();
        let handle = program.handle();
        program.delete(&api);
        assert_eq!(*api.deleted_programs.borrow(), vec![handle]);
    }

    #[test]
    fn test_stage_enums() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
