// elements/mod.rs
//
// The tween element state machine. Every animatable unit is one of a
// closed set of variants, so the scheduler can reason about terminal
// states exhaustively:
//
//   Idle → Active ⇄ Paused → Completed | Dead
//
// Leaves: Value (interpolation), Delay (time gate), Callback (one-shot).
// Composites: Sequence (one child at a time), Parallel (all at once).

pub mod callback;
pub mod delay;
pub mod looping;
pub mod parallel;
pub mod sequence;
pub mod value;

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::info::Info;
use crate::core::pool::Pools;
use crate::core::time::FrameTime;

pub use callback::Callback;
pub use delay::Delay;
pub use looping::{Loop, LoopMode};
pub use parallel::Parallel;
pub use sequence::Sequence;
pub use value::{AliveWhile, Liveness, Source, Target, Value};

/// Lifecycle state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Built but not registered yet.
    #[default]
    Idle,
    /// Receiving ticks.
    Active,
    /// Suspended; progress is kept.
    Paused,
    /// Finished naturally.
    Completed,
    /// Cancelled before finishing.
    Dead,
}

impl Phase {
    /// Terminal phases are pruned from the scheduler.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Completed | Phase::Dead)
    }
}

/// How a finished element ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Ran to the end (an auto-kill afterwards still counts as completed).
    Completed,
    /// Cancelled before finishing.
    Killed,
}

mod sealed {
    pub trait Sealed {}
}

/// Type-erased value element. Implemented only by this crate's value
/// state, which lets [`Element::Value`] hold any `Value<T>`.
pub trait Track: sealed::Sealed {
    fn phase(&self) -> Phase;
    fn tag(&self) -> Option<&str>;
    fn set_tag(&mut self, tag: Option<String>);
    fn progress(&self) -> f32;
    fn outcome(&self) -> Option<Outcome>;
    fn init(&mut self);
    fn tick(&mut self, time: &FrameTime);
    fn pause(&mut self);
    fn resume(&mut self);
    fn kill(&mut self);
    /// Stop looping; the running cycle finishes normally.
    fn terminate_loop(&mut self);
    fn info(&self) -> Info;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Hand the state back to its free list (if recyclable).
    fn recycle(self: Box<Self>, pools: &mut Pools);
}

/// Any unit participating in the tween state machine.
///
/// `Empty` is the null object returned by failed construction: it reports
/// `Phase::Dead`, is never registered, and ignores every control call.
#[derive(Default)]
pub enum Element {
    #[default]
    Empty,
    Value(Box<dyn Track>),
    Delay(Delay),
    Callback(Callback),
    Sequence(Sequence),
    Parallel(Parallel),
}

impl Element {
    pub fn phase(&self) -> Phase {
        match self {
            Element::Empty => Phase::Dead,
            Element::Value(track) => track.phase(),
            Element::Delay(delay) => delay.phase(),
            Element::Callback(callback) => callback.phase(),
            Element::Sequence(sequence) => sequence.phase(),
            Element::Parallel(parallel) => parallel.phase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Element::Empty => true,
            Element::Value(_) => false,
            Element::Delay(delay) => delay.is_empty(),
            Element::Callback(_) => false,
            Element::Sequence(sequence) => sequence.is_empty(),
            Element::Parallel(parallel) => parallel.is_empty(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Element::Empty => None,
            Element::Value(track) => track.tag(),
            Element::Delay(delay) => delay.tag(),
            Element::Callback(callback) => callback.tag(),
            Element::Sequence(sequence) => sequence.tag(),
            Element::Parallel(parallel) => parallel.tag(),
        }
    }

    /// Set the tag used for bulk pause/resume/kill.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = Some(tag.into());
        match &mut self {
            Element::Empty => {}
            Element::Value(track) => track.set_tag(tag),
            Element::Delay(delay) => delay.set_tag(tag),
            Element::Callback(callback) => callback.set_tag(tag),
            Element::Sequence(sequence) => sequence.set_tag(tag),
            Element::Parallel(parallel) => parallel.set_tag(tag),
        }
        self
    }

    /// Normalized completion in [0, 1].
    pub fn progress(&self) -> f32 {
        match self {
            Element::Empty => 0.0,
            Element::Value(track) => track.progress(),
            Element::Delay(delay) => delay.progress(),
            Element::Callback(callback) => callback.progress(),
            Element::Sequence(sequence) => sequence.progress(),
            Element::Parallel(parallel) => parallel.progress(),
        }
    }

    /// `None` until the element reaches a terminal phase.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Element::Empty => Some(Outcome::Killed),
            Element::Value(track) => track.outcome(),
            Element::Delay(delay) => delay.outcome(),
            Element::Callback(callback) => callback.outcome(),
            Element::Sequence(sequence) => sequence.outcome(),
            Element::Parallel(parallel) => parallel.outcome(),
        }
    }

    /// Idle → Active. Normally called by the scheduler on registration.
    pub fn init(&mut self) {
        match self {
            Element::Empty => {}
            Element::Value(track) => track.init(),
            Element::Delay(delay) => delay.init(),
            Element::Callback(callback) => callback.init(),
            Element::Sequence(sequence) => sequence.init(),
            Element::Parallel(parallel) => parallel.init(),
        }
    }

    /// Advance one frame. No-op unless `Active`.
    pub fn tick(&mut self, time: &FrameTime) {
        match self {
            Element::Empty => {}
            Element::Value(track) => track.tick(time),
            Element::Delay(delay) => delay.tick(time),
            Element::Callback(callback) => callback.tick(),
            Element::Sequence(sequence) => sequence.tick(time),
            Element::Parallel(parallel) => parallel.tick(time),
        }
    }

    pub fn pause(&mut self) {
        match self {
            Element::Empty => {}
            Element::Value(track) => track.pause(),
            Element::Delay(delay) => delay.pause(),
            Element::Callback(callback) => callback.pause(),
            Element::Sequence(sequence) => sequence.pause(),
            Element::Parallel(parallel) => parallel.pause(),
        }
    }

    pub fn resume(&mut self) {
        match self {
            Element::Empty => {}
            Element::Value(track) => track.resume(),
            Element::Delay(delay) => delay.resume(),
            Element::Callback(callback) => callback.resume(),
            Element::Sequence(sequence) => sequence.resume(),
            Element::Parallel(parallel) => parallel.resume(),
        }
    }

    pub fn kill(&mut self) {
        match self {
            Element::Empty => {}
            Element::Value(track) => track.kill(),
            Element::Delay(delay) => delay.kill(),
            Element::Callback(callback) => callback.kill(),
            Element::Sequence(sequence) => sequence.kill(),
            Element::Parallel(parallel) => parallel.kill(),
        }
    }

    /// Stop further loop cycles on every value element in this tree.
    pub fn terminate_loop(&mut self) {
        match self {
            Element::Value(track) => track.terminate_loop(),
            Element::Sequence(sequence) => sequence.children_mut().for_each(Element::terminate_loop),
            Element::Parallel(parallel) => parallel.children_mut().for_each(Element::terminate_loop),
            Element::Empty | Element::Delay(_) | Element::Callback(_) => {}
        }
    }

    /// Run `next` after this element finishes.
    pub fn then(self, next: impl Into<Element>) -> Sequence {
        match self {
            Element::Sequence(sequence) if sequence.phase() == Phase::Idle => sequence.then(next),
            other => Sequence::new([other, next.into()]),
        }
    }

    pub fn info(&self) -> Info {
        match self {
            Element::Empty => Info::new("Empty", Phase::Dead, 0.0),
            Element::Value(track) => track.info(),
            Element::Delay(delay) => delay.info(),
            Element::Callback(callback) => callback.info(),
            Element::Sequence(sequence) => sequence.info(),
            Element::Parallel(parallel) => parallel.info(),
        }
    }

    /// Return every recyclable value state in this tree to `pools`.
    pub(crate) fn recycle(self, pools: &mut Pools) {
        match self {
            Element::Value(track) => track.recycle(pools),
            Element::Sequence(sequence) => sequence.into_children().for_each(|child| child.recycle(pools)),
            Element::Parallel(parallel) => parallel.into_children().for_each(|child| child.recycle(pools)),
            Element::Empty | Element::Delay(_) | Element::Callback(_) => {}
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info())
    }
}

impl From<Delay> for Element {
    fn from(delay: Delay) -> Self {
        Element::Delay(delay)
    }
}

impl From<Callback> for Element {
    fn from(callback: Callback) -> Self {
        Element::Callback(callback)
    }
}

impl From<Sequence> for Element {
    fn from(sequence: Sequence) -> Self {
        Element::Sequence(sequence)
    }
}

impl From<Parallel> for Element {
    fn from(parallel: Parallel) -> Self {
        Element::Parallel(parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn empty_is_inert() {
        let mut element = Element::Empty.with_tag("ui");
        element.init();
        element.tick(&FrameTime::uniform(1.0));
        element.pause();
        element.resume();
        element.kill();
        assert!(element.is_empty());
        assert_eq!(element.phase(), Phase::Dead);
        assert_eq!(element.tag(), None);
    }

    #[test]
    fn tick_requires_active() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let mut element = Element::from(Callback::new(move || h.set(h.get() + 1)));

        element.tick(&FrameTime::uniform(0.1));
        assert_eq!(hits.get(), 0, "idle elements must not tick");

        element.init();
        element.pause();
        element.tick(&FrameTime::uniform(0.1));
        assert_eq!(hits.get(), 0, "paused elements must not tick");

        element.resume();
        element.tick(&FrameTime::uniform(0.1));
        assert_eq!(hits.get(), 1);
        assert_eq!(element.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn then_chains_into_one_sequence() {
        let sequence = Element::from(Delay::new(1.0))
            .then(Delay::new(1.0))
            .then(Delay::new(1.0));
        assert_eq!(sequence.len(), 3);
    }

    #[test]
    fn with_tag_applies_to_composites() {
        let element = Element::from(Parallel::new([Delay::new(1.0).into()])).with_tag("fx");
        assert_eq!(element.tag(), Some("fx"));
    }

    #[test]
    fn phase_finished_states() {
        assert!(Phase::Completed.is_finished());
        assert!(Phase::Dead.is_finished());
        assert!(!Phase::Paused.is_finished());
        assert!(!Phase::Idle.is_finished());
    }
}
