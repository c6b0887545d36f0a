// core/scheduler.rs
//
// Owns every registered root element and advances each one exactly once
// per host tick. Finished roots are pruned in the same backward pass that
// ticks them, so a removal never skips or double-visits a sibling.
//
// Usage:
//   let mut scheduler = Scheduler::new();
//   let id = scheduler.register(Value::lerp(get, 1.0, 0.5, set).with_tag("ui"));
//   scheduler.tick(dt);          // once per frame
//   scheduler.pause(Some("ui"));  // bulk control by tag

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::config::SchedulerConfig;
use super::pool::Pools;
use super::time::Clock;
use crate::api::info::Info;
use crate::api::types::{TweenEvent, TweenId};
use crate::elements::value::{Source, Target, Value, ValueState};
use crate::elements::{Element, Phase};

struct Entry {
    id: TweenId,
    element: Element,
}

type Queue = Rc<RefCell<Vec<Element>>>;

pub struct Scheduler {
    entries: Vec<Entry>,
    capacity: usize,
    next_id: u32,
    clock: Clock,
    pools: Pools,
    events: Vec<TweenEvent>,
    /// Registrations made through a [`Spawner`], applied at the end of a tick.
    deferred: Queue,
    running: bool,
    ticking: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let capacity = config.max_tweens.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
            clock: Clock::new(config.time_scale),
            pools: Pools::new(config.pool_limit),
            events: Vec::new(),
            deferred: Rc::new(RefCell::new(Vec::new())),
            running: true,
            ticking: false,
        }
    }

    /// Initialize and start tracking a root element.
    ///
    /// Returns `None` (and logs) when the element is empty, the scheduler
    /// is full, or it has been shut down.
    pub fn register(&mut self, element: impl Into<Element>) -> Option<TweenId> {
        let mut element = element.into();
        if !self.running {
            log::error!("Cannot register tween: scheduler has been shut down");
            return None;
        }
        if element.is_empty() {
            log::debug!("Ignoring empty tween");
            return None;
        }
        if self.entries.len() >= self.capacity {
            log::warn!(
                "Active tween limit ({}) reached. Raise max_tweens or set_capacity to allow more tweens.",
                self.capacity
            );
            element.recycle(&mut self.pools);
            return None;
        }

        element.init();
        let id = self.allocate_id();
        self.entries.push(Entry { id, element });
        if !self.ticking {
            self.ticking = true;
            log::debug!("Tween scheduler started ticking");
        }
        Some(id)
    }

    fn allocate_id(&mut self) -> TweenId {
        let id = TweenId(self.next_id);
        // 0 is reserved as "rejected" for hosts that cannot express Option.
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }

    /// Advance every active root by one frame and prune finished ones.
    /// Returns how many roots were removed.
    pub fn tick(&mut self, dt: f32) -> usize {
        let time = self.clock.advance(dt);
        let mut removed = 0;

        for i in (0..self.entries.len()).rev() {
            let element = &mut self.entries[i].element;
            if element.phase() == Phase::Active {
                element.tick(&time);
            }
            if element.phase().is_finished() {
                self.remove_at(i);
                removed += 1;
            }
        }

        self.drain_deferred();
        self.update_ticking();
        removed
    }

    fn remove_at(&mut self, index: usize) {
        let Entry { id, element } = self.entries.swap_remove(index);
        if let Some(outcome) = element.outcome() {
            self.events.push(TweenEvent::new(id, outcome));
        }
        element.recycle(&mut self.pools);
    }

    fn prune(&mut self) -> usize {
        let mut removed = 0;
        for i in (0..self.entries.len()).rev() {
            if self.entries[i].element.phase().is_finished() {
                self.remove_at(i);
                removed += 1;
            }
        }
        self.update_ticking();
        removed
    }

    fn update_ticking(&mut self) {
        if self.ticking && self.entries.is_empty() {
            self.ticking = false;
            log::debug!("Tween scheduler idle");
        }
    }

    fn drain_deferred(&mut self) {
        let pending = std::mem::take(&mut *self.deferred.borrow_mut());
        for element in pending {
            self.register(element);
        }
    }

    /// Apply `f` to every root matching `tag` (None or "" = all).
    fn for_tagged(&mut self, tag: Option<&str>, mut f: impl FnMut(&mut Element)) -> usize {
        let tag = tag.filter(|t| !t.is_empty());
        let mut matched = 0;
        for entry in &mut self.entries {
            if tag.is_none() || entry.element.tag() == tag {
                f(&mut entry.element);
                matched += 1;
            }
        }
        matched
    }

    // -- Bulk control by tag --

    pub fn pause(&mut self, tag: Option<&str>) -> usize {
        self.for_tagged(tag, Element::pause)
    }

    pub fn resume(&mut self, tag: Option<&str>) -> usize {
        self.for_tagged(tag, Element::resume)
    }

    /// Kill matching roots and prune them immediately.
    pub fn kill(&mut self, tag: Option<&str>) -> usize {
        self.for_tagged(tag, Element::kill);
        self.prune()
    }

    // -- Per-handle control --

    fn get_mut(&mut self, id: TweenId) -> Option<&mut Element> {
        self.entries.iter_mut().find(|e| e.id == id).map(|e| &mut e.element)
    }

    fn get(&self, id: TweenId) -> Option<&Element> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.element)
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.get(id).is_some()
    }

    pub fn pause_id(&mut self, id: TweenId) -> bool {
        self.get_mut(id).map(Element::pause).is_some()
    }

    pub fn resume_id(&mut self, id: TweenId) -> bool {
        self.get_mut(id).map(Element::resume).is_some()
    }

    pub fn kill_id(&mut self, id: TweenId) -> bool {
        let found = self.get_mut(id).map(Element::kill).is_some();
        if found {
            self.prune();
        }
        found
    }

    /// Let the running cycle finish, then stop looping.
    pub fn terminate_loop(&mut self, id: TweenId) -> bool {
        self.get_mut(id).map(Element::terminate_loop).is_some()
    }

    /// Change the end value of a registered `Value<T>`.
    /// `false` if `id` is unknown or not a value of type `T`.
    pub fn set_target<T: Clone + 'static>(&mut self, id: TweenId, value: T) -> bool {
        match self.get_mut(id) {
            Some(Element::Value(track)) => match track.as_any_mut().downcast_mut::<ValueState<T>>() {
                Some(state) => state.retarget(value),
                None => {
                    log::warn!("set_target: tween {} does not animate {}", id.0, std::any::type_name::<T>());
                    false
                }
            },
            _ => false,
        }
    }

    pub fn phase(&self, id: TweenId) -> Option<Phase> {
        self.get(id).map(Element::phase)
    }

    pub fn progress(&self, id: TweenId) -> Option<f32> {
        self.get(id).map(Element::progress)
    }

    pub fn tag(&self, id: TweenId) -> Option<&str> {
        self.get(id).and_then(Element::tag)
    }

    // -- Building from the pools --

    /// A value element backed by this scheduler's pools.
    pub fn value<T: Clone + 'static>(
        &mut self,
        source: impl Source<T> + 'static,
        target: impl Into<Target<T>>,
        duration: f32,
        apply: impl FnMut(T) + 'static,
        evaluator: impl Fn(&T, &T, f32) -> T + 'static,
    ) -> Value<T> {
        Value::pooled(&mut self.pools, source, target, duration, apply, evaluator)
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn pools_mut(&mut self) -> &mut Pools {
        &mut self.pools
    }

    // -- State --

    /// Whether the host needs to keep calling [`Scheduler::tick`].
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the registration limit. Never drops below the current count.
    pub fn set_capacity(&mut self, capacity: usize) {
        let floor = self.entries.len().max(1);
        if capacity < floor {
            log::warn!("Tween capacity {} is below the {} active tweens; using {}", capacity, self.entries.len(), floor);
        }
        self.capacity = capacity.max(floor);
        self.entries.reserve(self.capacity - self.entries.len());
    }

    pub fn time_scale(&self) -> f32 {
        self.clock.time_scale()
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.clock.set_time_scale(scale);
    }

    /// Total unscaled seconds delivered to [`Scheduler::tick`].
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Completion/kill events since the last drain.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TweenEvent> + '_ {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[TweenEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Vec<(TweenId, Info)> {
        self.entries.iter().map(|e| (e.id, e.element.info())).collect()
    }

    /// Handle for registering elements from inside callbacks.
    pub fn spawner(&self) -> Spawner {
        Spawner { queue: Rc::downgrade(&self.deferred) }
    }

    /// Kill and recycle everything and refuse further registrations.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.deferred.borrow_mut().clear();
        let killed = self.kill(None);
        self.running = false;
        self.ticking = false;
        log::info!("Tween scheduler shut down ({} tweens killed)", killed);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues elements for registration at the end of the current (or next)
/// tick. Cloneable and safe to move into callbacks.
#[derive(Clone)]
pub struct Spawner {
    queue: Weak<RefCell<Vec<Element>>>,
}

impl Spawner {
    /// `false` if the scheduler is gone, busy, or the element is empty.
    pub fn play(&self, element: impl Into<Element>) -> bool {
        let element = element.into();
        if element.is_empty() {
            return false;
        }
        let Some(queue) = self.queue.upgrade() else {
            log::warn!("Spawner: scheduler dropped, ignoring tween");
            return false;
        };
        let Ok(mut queue) = queue.try_borrow_mut() else {
            log::warn!("Spawner: queue is busy, ignoring tween");
            return false;
        };
        queue.push(element);
        true
    }
}
