//! # GLES Engine
//!
//! A small OpenGL ES 2 runtime for demos: a glfw window (or the bare
//! framebuffer on embedded boards), an EGL context, and a fixed-rate render
//! loop on its own thread that draws a static colored triangle.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gles_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     gles_engine::foundation::logging::init(LevelFilter::Info);
//!     let engine = Engine::new(DemoConfig::default(), RunOptions { print_info: true })?;
//!     let stats = engine.run()?;
//!     println!("{} frames", stats.frames);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod config;
pub mod foundation;
pub mod gl;
pub mod platform;
pub mod render;
pub mod window;

mod application;
mod engine;

pub use application::{AppEvent, LoopAction};
pub use engine::{Engine, EngineError, RunOptions};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppEvent, Engine, EngineError, RunOptions,
        config::{
            Config, ConfigError, DemoConfig, EglConfig, RenderConfig, TargetKind, WindowConfig,
        },
        foundation::logging::LevelFilter,
        render::{FrameRenderer, LoopStats, RenderLoop, RenderLoopHandle},
    };
}
