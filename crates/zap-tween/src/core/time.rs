use serde::{Deserialize, Serialize};

/// Which delta an element consumes each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeMode {
    /// Host delta multiplied by the scheduler's time scale.
    #[default]
    Scaled,
    /// Raw host delta, unaffected by time scale (pause menus, UI).
    Unscaled,
}

/// Deltas for a single frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    pub scaled: f32,
    pub unscaled: f32,
}

impl FrameTime {
    /// Both deltas equal to `dt` (time scale of 1).
    pub fn uniform(dt: f32) -> Self {
        Self { scaled: dt, unscaled: dt }
    }

    /// The delta for the given time mode.
    #[inline]
    pub fn delta(&self, mode: TimeMode) -> f32 {
        match mode {
            TimeMode::Scaled => self.scaled,
            TimeMode::Unscaled => self.unscaled,
        }
    }
}

/// Converts host frame deltas into per-mode frame times.
#[derive(Debug, Clone)]
pub struct Clock {
    time_scale: f32,
    /// Total unscaled seconds delivered so far.
    elapsed: f64,
}

impl Clock {
    pub fn new(time_scale: f32) -> Self {
        let mut clock = Self { time_scale: 1.0, elapsed: 0.0 };
        clock.set_time_scale(time_scale);
        clock
    }

    /// Advance by one host frame. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, frame_dt: f32) -> FrameTime {
        let dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.elapsed += dt as f64;
        FrameTime {
            scaled: dt * self.time_scale,
            unscaled: dt,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the multiplier for scaled time. Negative or non-finite values are ignored.
    pub fn set_time_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale >= 0.0 {
            self.time_scale = scale;
        } else {
            log::warn!("Ignoring invalid time scale {}", scale);
        }
    }

    /// Total unscaled seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(1.0)
    }
}
