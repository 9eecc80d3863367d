//! Frame timing utilities

use std::time::{Duration, Instant};

/// Frame counter for the render loop
///
/// Tracks the time between presented frames and the running totals used for
/// the shutdown statistics.
#[derive(Debug)]
pub struct Timer {
    started: Instant,
    last_frame: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Record one presented frame
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time between the last two frames in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Wall time since the timer was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of frames recorded
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation
    pub fn average_fps(&self) -> f32 {
        let secs = self.elapsed().as_secs_f32();
        if secs > 0.0 {
            self.frame_count as f32 / secs
        } else {
            0.0
        }
    }
}

/// Interval between ticks for a fixed frame rate
///
/// Returns `None` for a rate of zero.
pub fn frame_interval(frames_per_second: u32) -> Option<Duration> {
    if frames_per_second == 0 {
        return None;
    }
    Some(Duration::from_nanos(1_000_000_000 / u64::from(frames_per_second)))
}
