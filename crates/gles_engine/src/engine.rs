//! Engine orchestration
//!
//! The main thread owns the window and its event queue. A dedicated render
//! thread owns everything EGL and GL: it initializes the platform, builds the
//! scene and then runs the fixed-rate [`RenderLoop`]. The two sides talk only
//! through the loop's command channel.

use crate::application::LoopAction;
use crate::config::{ConfigError, DemoConfig, TargetKind};
use crate::gl::ShaderError;
use crate::platform::{EglError, NativeTarget};
use crate::render::{EglRenderer, LoopStats, RenderLoop, RenderLoopError, RenderLoopHandle};
use crate::window::{Window, WindowError};
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// How long the main thread blocks on window events before checking for
/// signals and render thread exit
const EVENT_WAIT_SECS: f64 = 0.05;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Window creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// EGL setup or presentation failed
    #[error("EGL error: {0}")]
    Egl(#[from] EglError),

    /// Shader program could not be built
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),

    /// Render loop could not be created or reached
    #[error("Render loop error: {0}")]
    RenderLoop(#[from] RenderLoopError),

    /// The termination signal handler could not be installed
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),

    /// A frame failed after setup
    #[error("Rendering stopped: {0}")]
    RenderFailed(String),

    /// The render thread could not be started or ended unexpectedly
    #[error("Render thread error: {0}")]
    Thread(String),
}

/// Per-run switches not stored in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log the GL and EGL identification strings before rendering
    pub print_info: bool,
}

/// Main engine struct
#[derive(Debug)]
pub struct Engine {
    config: DemoConfig,
    options: RunOptions,
}

struct RenderThread {
    handle: RenderLoopHandle,
    join: JoinHandle<Option<LoopStats>>,
}

impl Engine {
    /// Validate the configuration and create the engine
    pub fn new(config: DemoConfig, options: RunOptions) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config, options })
    }

    /// Configuration in use
    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Render until the window closes or a termination signal arrives
    pub fn run(self) -> Result<LoopStats, EngineError> {
        let shutdown = install_signal_handler()?;

        let stats = match self.config.window.target {
            TargetKind::Xorg => self.run_windowed(&shutdown)?,
            TargetKind::Framebuffer => self.run_framebuffer(&shutdown)?,
        };

        match stats.failure {
            Some(failure) => Err(EngineError::RenderFailed(failure)),
            None => Ok(stats),
        }
    }

    fn run_windowed(&self, shutdown: &Receiver<()>) -> Result<LoopStats, EngineError> {
        let mut window = Window::new(&self.config.window)?;
        let target = window.native_target()?;

        let size = match window.framebuffer_size() {
            (0, _) | (_, 0) => (self.config.window.width, self.config.window.height),
            size => size,
        };

        let render = self.spawn_render_thread(target, size)?;

        loop {
            window.wait_events_timeout(EVENT_WAIT_SECS);

            let mut render_alive = true;
            for event in window.drain_events() {
                render_alive &= forward(&render.handle, event.action());
            }

            if window.should_close() {
                log::info!("Window closed");
                break;
            }
            if shutdown.try_recv().is_ok() {
                log::info!("Shutting down on signal");
                break;
            }
            if !render_alive || render.join.is_finished() {
                log::warn!("Render thread stopped on its own");
                break;
            }
        }

        render.shutdown()
    }

    fn run_framebuffer(&self, shutdown: &Receiver<()>) -> Result<LoopStats, EngineError> {
        let size = (self.config.window.width, self.config.window.height);
        let render = self.spawn_render_thread(NativeTarget::Framebuffer, size)?;

        loop {
            match shutdown.recv_timeout(Duration::from_millis(100)) {
                Ok(()) => {
                    log::info!("Shutting down on signal");
                    break;
                }
                Err(RecvTimeoutError::Timeout) if !render.join.is_finished() => {}
                Err(_) => {
                    log::warn!("Render thread stopped on its own");
                    break;
                }
            }
        }

        render.shutdown()
    }

    /// Start the render thread and wait until its setup finished
    fn spawn_render_thread(
        &self,
        target: NativeTarget,
        size: (u32, u32),
    ) -> Result<RenderThread, EngineError> {
        let (render_loop, handle) = RenderLoop::new(self.config.render.frames_per_second)?;
        let (ready_tx, ready_rx) = bounded::<Result<(), EngineError>>(1);

        let egl_config = self.config.egl.clone();
        let render_config = self.config.render.clone();
        let print_info = self.options.print_info;

        let join = thread::Builder::new()
            .name("render loop".to_string())
            .spawn(move || {
                let setup =
                    EglRenderer::new(target, &egl_config, &render_config, size, print_info);
                let mut renderer = match setup {
                    Ok(renderer) => renderer,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return None;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                Some(render_loop.run(&mut renderer))
            })
            .map_err(|e| EngineError::Thread(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(RenderThread { handle, join }),
            Ok(Err(e)) => {
                let _ = join.join();
                Err(e)
            }
            // The sender only disappears without a message when setup panicked
            Err(_) => match join.join() {
                Err(panic) => std::panic::resume_unwind(panic),
                Ok(_) => Err(EngineError::Thread("render thread exited during setup".to_string())),
            },
        }
    }
}

impl RenderThread {
    /// Terminate the loop (if still running) and collect its statistics
    fn shutdown(self) -> Result<LoopStats, EngineError> {
        if self.handle.terminate().is_err() {
            log::debug!("Render loop already stopped");
        }
        match self.join.join() {
            Ok(Some(stats)) => Ok(stats),
            Ok(None) => Err(EngineError::Thread(
                "render thread never started its loop".to_string(),
            )),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Forward a window action to the render loop; `false` once the loop is gone
fn forward(handle: &RenderLoopHandle, action: LoopAction) -> bool {
    let result = match action {
        LoopAction::Continue | LoopAction::Exit => Ok(()),
        LoopAction::Resize(width, height) => handle.resize(width, height),
        LoopAction::Pause => handle.pause(),
        LoopAction::Resume => handle.resume(),
    };
    result.is_ok()
}

/// Turn SIGINT/SIGTERM into a message on the returned channel
fn install_signal_handler() -> Result<Receiver<()>, EngineError> {
    let (signal_tx, signal_rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = signal_tx.try_send(());
    })?;
    Ok(signal_rx)
}
