// elements/parallel.rs
//
// Runs children concurrently; completes when the last one finishes.

use super::{Element, Outcome, Phase};
use crate::api::info::Info;
use crate::core::time::FrameTime;

pub struct Parallel {
    tag: Option<String>,
    phase: Phase,
    live: Vec<Element>,
    /// Finished children, kept until the group is recycled.
    done: Vec<Element>,
}

impl Parallel {
    /// Empty children are dropped.
    pub fn new(children: impl IntoIterator<Item = Element>) -> Self {
        Self {
            tag: None,
            phase: Phase::Idle,
            live: children.into_iter().filter(|child| !child.is_empty()).collect(),
            done: Vec::new(),
        }
    }

    /// Add a child. Ignored once the group has started.
    pub fn with(mut self, child: impl Into<Element>) -> Self {
        let child = child.into();
        if child.is_empty() {
            log::debug!("Parallel: skipping empty element");
        } else if self.phase != Phase::Idle {
            log::warn!("Parallel: cannot add children after the group has started");
        } else {
            self.live.push(child);
        }
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Children still running.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.done.is_empty()
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

    /// Progress of the slowest running child. A killed group keeps the
    /// progress its children reached.
    pub fn progress(&self) -> f32 {
        let slowest = |children: &[Element]| children.iter().map(Element::progress).fold(1.0, f32::min);
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Completed => 1.0,
            Phase::Dead => slowest(&self.done),
            _ => slowest(&self.live),
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
        if self.phase != Phase::Idle {
            return;
        }
        self.live.iter_mut().for_each(Element::init);
        self.phase = if self.live.is_empty() { Phase::Completed } else { Phase::Active };
    }

    pub(crate) fn tick(&mut self, time: &FrameTime) {
        if self.phase != Phase::Active {
            return;
        }
        // Reverse so swap_remove never skips an unvisited child.
        for i in (0..self.live.len()).rev() {
            let child = &mut self.live[i];
            if child.phase() == Phase::Active {
                child.tick(time);
            }
            if child.phase().is_finished() {
                let finished = self.live.swap_remove(i);
                self.done.push(finished);
            }
        }
        if self.live.is_empty() {
            self.phase = Phase::Completed;
        }
    }

    pub(crate) fn pause(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Paused;
            self.live.iter_mut().for_each(Element::pause);
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Active;
            self.live.iter_mut().for_each(Element::resume);
        }
    }

    pub(crate) fn kill(&mut self) {
        if self.phase.is_finished() {
            return;
        }
        self.phase = Phase::Dead;
        for mut child in self.live.drain(..) {
            child.kill();
            self.done.push(child);
        }
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.live.iter_mut()
    }

    pub(crate) fn into_children(self) -> impl Iterator<Item = Element> {
        self.live.into_iter().chain(self.done)
    }

    pub fn info(&self) -> Info {
        Info::new("Parallel", self.phase, self.progress())
            .with_tag(self.tag.as_deref())
            .property("Running", self.live.len())
            .property("Finished", self.done.len())
    }
}
