// elements/callback.rs

use super::{Outcome, Phase};
use crate::api::info::Info;
use crate::core::guard;

/// One-shot action, run on the first tick after activation.
///
/// Completes even when the action panics; the panic is logged.
pub struct Callback {
    tag: Option<String>,
    phase: Phase,
    action: Option<Box<dyn FnOnce()>>,
}

impl Callback {
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self { tag: None, phase: Phase::Idle, action: Some(Box::new(action)) }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
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

    pub fn progress(&self) -> f32 {
        if self.phase == Phase::Completed { 1.0 } else { 0.0 }
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
            self.phase = Phase::Active;
        }
    }

    pub(crate) fn tick(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        if let Some(action) = self.action.take() {
            guard::guarded("action", action);
        }
        self.phase = Phase::Completed;
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
            self.action = None;
        }
    }

    pub fn info(&self) -> Info {
        Info::new("Callback", self.phase, self.progress()).with_tag(self.tag.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn runs_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut callback = Callback::new(move || c.set(c.get() + 1));
        callback.init();
        callback.tick();
        callback.tick();
        assert_eq!(count.get(), 1);
        assert_eq!(callback.phase(), Phase::Completed);
    }

    #[test]
    fn completes_after_panic() {
        let mut callback = Callback::new(|| panic!("oops"));
        callback.init();
        callback.tick();
        assert_eq!(callback.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn completed_callback_ignores_kill() {
        let mut callback = Callback::new(|| {});
        callback.init();
        callback.tick();
        callback.kill();
        assert_eq!(callback.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn killed_never_runs() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        let mut callback = Callback::new(move || r.set(true));
        callback.init();
        callback.kill();
        callback.tick();
        assert!(!ran.get());
        assert_eq!(callback.outcome(), Some(Outcome::Killed));
    }
}
