// elements/delay.rs
//
// Time gate: counts down, then (optionally) waits for a predicate.

use super::{Outcome, Phase};
use crate::api::info::Info;
use crate::core::guard;
use crate::core::time::{FrameTime, TimeMode};

pub struct Delay {
    tag: Option<String>,
    phase: Phase,
    duration: f32,
    remaining: f32,
    time_mode: TimeMode,
    predicate: Option<Box<dyn FnMut() -> bool>>,
}

impl Delay {
    /// Wait `seconds`. `f32::INFINITY` waits until killed.
    pub fn new(seconds: f32) -> Self {
        Self {
            tag: None,
            phase: Phase::Idle,
            duration: if seconds.is_nan() { 0.0 } else { seconds.max(0.0) },
            remaining: 0.0,
            time_mode: TimeMode::Scaled,
            predicate: None,
        }
    }

    /// Wait until `predicate` returns true (checked once per tick).
    pub fn until(predicate: impl FnMut() -> bool + 'static) -> Self {
        Self::with_until(0.0, predicate)
    }

    /// Wait at least `seconds`, then until `predicate` holds.
    pub fn with_until(seconds: f32, predicate: impl FnMut() -> bool + 'static) -> Self {
        let mut delay = Self::new(seconds);
        delay.predicate = Some(Box::new(predicate));
        delay
    }

    pub fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Nothing to wait for: zero countdown and no predicate.
    pub fn is_empty(&self) -> bool {
        self.duration <= 0.0 && self.predicate.is_none()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub(crate) fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn progress(&self) -> f32 {
        match self.phase {
            Phase::Completed => 1.0,
            _ if self.duration > 0.0 && self.duration.is_finite() => 1.0 - self.remaining / self.duration,
            _ => 0.0,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Completed => Some(Outcome::Completed),
            Phase::Dead => Some(Outcome::Killed),
            _ => None,
        }
    }

    pub(crate) fn init(&mut self) {
        if self.phase == Phase::Idle {
            self.remaining = self.duration;
            self.phase = Phase::Active;
        }
    }

    pub(crate) fn tick(&mut self, time: &FrameTime) {
        if self.phase != Phase::Active {
            return;
        }
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - time.delta(self.time_mode)).max(0.0);
            if self.remaining > 0.0 {
                return;
            }
        }
        let ready = match self.predicate.as_mut() {
            None => Some(true),
            Some(predicate) => guard::guarded("predicate", || predicate()),
        };
        match ready {
            Some(true) => {
                self.phase = Phase::Completed;
                self.predicate = None;
            }
            Some(false) => {}
            None => self.kill(),
        }
    }

    pub(crate) fn pause(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Paused;
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Active;
        }
    }

    pub(crate) fn kill(&mut self) {
        if !self.phase.is_finished() {
            self.phase = Phase::Dead;
            self.predicate = None;
        }
    }

    pub fn info(&self) -> Info {
        let mut info = Info::new("Delay", self.phase, self.progress())
            .with_tag(self.tag.as_deref())
            .property("Duration", format!("{:.2}s", self.duration))
            .property("Remaining", format!("{:.2}s", self.remaining));
        if self.predicate.is_some() {
            info = info.property("Predicate", "pending");
        }
        info
    }
}
