//! Fixed-rate render loop
//!
//! The loop runs on the thread that owns the GL context. Each iteration
//! selects between a control command and a ticker tick; a tick renders and
//! presents one frame. Pausing swaps the ticker for a channel that never
//! fires, so a paused loop sleeps until the next command.
//!
//! Commands other than `Resize` are acknowledged once they have taken
//! effect, which lets the caller rely on "no frame is drawn after `pause`
//! returns" and "resources are released once `terminate` returns".

use super::FrameRenderer;
use crate::foundation::time::{frame_interval, Timer};
use crossbeam::channel::{bounded, never, select, tick, unbounded, Receiver, Sender};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Render loop errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderLoopError {
    /// A frame rate of zero has no tick interval
    #[error("Frame rate must be positive")]
    InvalidFrameRate,

    /// The loop has already stopped
    #[error("Render loop is no longer running")]
    Disconnected,
}

enum Command {
    Pause(Sender<()>),
    Resume(Sender<()>),
    Resize(u32, u32),
    Terminate(Sender<()>),
}

enum Wakeup {
    /// `None` once every handle is gone
    Command(Option<Command>),
    Tick,
}

/// Summary returned when the loop ends
#[derive(Debug, Clone, PartialEq)]
pub struct LoopStats {
    /// Frames rendered and presented
    pub frames: u64,
    /// Time the loop ran
    pub elapsed: Duration,
    /// Average frames per second over `elapsed`
    pub average_fps: f32,
    /// Set when the loop stopped because a frame failed
    pub failure: Option<String>,
}

/// The receiving half, run on the render thread
#[derive(Debug)]
pub struct RenderLoop {
    interval: Duration,
    commands: Receiver<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pause(_) => write!(f, "Pause"),
            Self::Resume(_) => write!(f, "Resume"),
            Self::Resize(width, height) => write!(f, "Resize({}x{})", width, height),
            Self::Terminate(_) => write!(f, "Terminate"),
        }
    }
}

/// Controls a running [`RenderLoop`] from another thread
#[derive(Debug, Clone)]
pub struct RenderLoopHandle {
    commands: Sender<Command>,
}

impl RenderLoop {
    /// Create a loop ticking `frames_per_second` times per second
    pub fn new(frames_per_second: u32) -> Result<(Self, RenderLoopHandle), RenderLoopError> {
        let interval = frame_interval(frames_per_second).ok_or(RenderLoopError::InvalidFrameRate)?;
        let (commands_tx, commands_rx) = unbounded();
        Ok((
            Self {
                interval,
                commands: commands_rx,
            },
            RenderLoopHandle { commands: commands_tx },
        ))
    }

    /// Tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `renderer` until terminated, until every handle is dropped, or
    /// until a frame fails. `cleanup` runs exactly once in all three cases.
    pub fn run<R: FrameRenderer>(self, renderer: &mut R) -> LoopStats {
        let mut ticker: Receiver<Instant> = tick(self.interval);
        let mut paused = false;
        let mut timer = Timer::new();
        let mut failure = None;

        log::info!("Render loop started ({:?} per frame)", self.interval);

        loop {
            let wakeup = select! {
                recv(self.commands) -> command => Wakeup::Command(command.ok()),
                recv(ticker) -> _ => Wakeup::Tick,
            };

            match wakeup {
                Wakeup::Command(Some(Command::Pause(ack))) => {
                    if !paused {
                        ticker = never();
                        paused = true;
                        log::debug!("Render loop paused after {} frames", timer.frame_count());
                    }
                    let _ = ack.send(());
                }
                Wakeup::Command(Some(Command::Resume(ack))) => {
                    if paused {
                        ticker = tick(self.interval);
                        paused = false;
                        log::debug!("Render loop resumed");
                    }
                    let _ = ack.send(());
                }
                Wakeup::Command(Some(Command::Resize(width, height))) => {
                    log::debug!("Reshape to {}x{}", width, height);
                    renderer.reshape(width, height);
                }
                Wakeup::Command(Some(Command::Terminate(ack))) => {
                    renderer.cleanup();
                    let _ = ack.send(());
                    break;
                }
                Wakeup::Command(None) => {
                    log::debug!("All render loop handles dropped");
                    renderer.cleanup();
                    break;
                }
                Wakeup::Tick => {
                    if let Err(e) = renderer.render_frame() {
                        log::error!("Frame {} failed: {}", timer.frame_count() + 1, e);
                        failure = Some(e.to_string());
                        renderer.cleanup();
                        break;
                    }
                    timer.tick();
                }
            }
        }

        let stats = LoopStats {
            frames: timer.frame_count(),
            elapsed: timer.elapsed(),
            average_fps: timer.average_fps(),
            failure,
        };
        log::info!(
            "Render loop stopped: {} frames in {:.2}s ({:.1} fps)",
            stats.frames,
            stats.elapsed.as_secs_f32(),
            stats.average_fps
        );
        stats
    }
}

impl RenderLoopHandle {
    /// Stop rendering; returns once the ticker is stopped
    pub fn pause(&self) -> Result<(), RenderLoopError> {
        self.request(Command::Pause)
    }

    /// Restart the ticker after [`RenderLoopHandle::pause`]
    pub fn resume(&self) -> Result<(), RenderLoopError> {
        self.request(Command::Resume)
    }

    /// Forward a new drawable size; does not wait
    pub fn resize(&self, width: u32, height: u32) -> Result<(), RenderLoopError> {
        self.commands
            .send(Command::Resize(width, height))
            .map_err(|_| RenderLoopError::Disconnected)
    }

    /// Stop the loop; returns once graphics resources are released
    pub fn terminate(&self) -> Result<(), RenderLoopError> {
        self.request(Command::Terminate)
    }

    fn request(&self, command: fn(Sender<()>) -> Command) -> Result<(), RenderLoopError> {
        let (ack_tx, ack_rx) = bounded(1);
        self.commands
            .send(command(ack_tx))
            .map_err(|_| RenderLoopError::Disconnected)?;
        ack_rx.recv().map_err(|_| RenderLoopError::Disconnected)
    }
}
