// elements/sequence.rs
//
// Runs children one after another. Only the current child is initialized
// and ticked; queued children stay Idle until their turn.

use super::{Element, Outcome, Phase};
use crate::api::info::Info;
use crate::core::time::FrameTime;

pub struct Sequence {
    tag: Option<String>,
    phase: Phase,
    children: Vec<Element>,
    current: usize,
}

impl Sequence {
    /// Empty children are dropped.
    pub fn new(children: impl IntoIterator<Item = Element>) -> Self {
        Self {
            tag: None,
            phase: Phase::Idle,
            children: children.into_iter().filter(|child| !child.is_empty()).collect(),
            current: 0,
        }
    }

    /// Append a child. Ignored once the sequence has started.
    pub fn then(mut self, next: impl Into<Element>) -> Self {
        let next = next.into();
        if next.is_empty() {
            log::debug!("Sequence: skipping empty element");
        } else if self.phase != Phase::Idle {
            log::warn!("Sequence: cannot append after the sequence has started");
        } else {
            self.children.push(next);
        }
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
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

    /// Index of the running child.
    pub fn current(&self) -> usize {
        self.current
    }

    /// `(finished + current.progress) / total`.
    pub fn progress(&self) -> f32 {
        if self.phase == Phase::Completed {
            return 1.0;
        }
        if self.children.is_empty() {
            return 0.0;
        }
        let running = self.children.get(self.current).map_or(0.0, Element::progress);
        ((self.current as f32 + running) / self.children.len() as f32).min(1.0)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Completed => Some(Outcome::Completed),
            Phase::Dead => Some(Outcome::Killed),
            _ => None,
        }
    }

    pub(crate) fn init(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.current = 0;
        match self.children.first_mut() {
            Some(first) => {
                first.init();
                self.phase = Phase::Active;
            }
            None => self.phase = Phase::Completed,
        }
    }

    pub(crate) fn tick(&mut self, time: &FrameTime) {
        if self.phase != Phase::Active {
            return;
        }
        let Some(child) = self.children.get_mut(self.current) else {
            self.phase = Phase::Completed;
            return;
        };
        if child.phase() == Phase::Active {
            child.tick(time);
        }
        if !child.phase().is_finished() {
            return;
        }

        // The next child starts now but receives its first tick next frame.
        self.current += 1;
        match self.children.get_mut(self.current) {
            Some(next) => next.init(),
            None => self.phase = Phase::Completed,
        }
    }

    pub(crate) fn pause(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Paused;
            if let Some(child) = self.children.get_mut(self.current) {
                child.pause();
            }
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Active;
            if let Some(child) = self.children.get_mut(self.current) {
                child.resume();
            }
        }
    }

    /// Kill the running child. Queued children are never started.
    pub(crate) fn kill(&mut self) {
        if self.phase.is_finished() {
            return;
        }
        self.phase = Phase::Dead;
        if let Some(child) = self.children.get_mut(self.current) {
            child.kill();
        }
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut()
    }

    pub(crate) fn into_children(self) -> impl Iterator<Item = Element> {
        self.children.into_iter()
    }

    pub fn info(&self) -> Info {
        Info::new("Sequence", self.phase, self.progress())
            .with_tag(self.tag.as_deref())
            .property("Step", format!("{}/{}", (self.current + 1).min(self.children.len()), self.children.len()))
    }
}
