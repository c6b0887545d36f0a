// elements/value.rs
//
// Value element: interpolates a captured start value toward an end value
// over a fixed duration and pushes each frame's result through `apply`.
// Start and end are sampled lazily on the first tick past the delay, so a
// tween built early still begins from the property's current value.

use std::any::{type_name, Any};
use std::rc::{self, Rc};
use std::sync;

use super::looping::{Loop, LoopMode};
use super::{sealed, Outcome, Phase, Track};
use crate::api::info::Info;
use crate::core::guard;
use crate::core::pool::Pools;
use crate::core::time::{FrameTime, TimeMode};
use crate::extensions::easing::{Curve, Ease, Easing};
use crate::extensions::lerp::{lerp_unclamped, Lerp, Snap};

/// Produces a value on demand (the getter side of a tween).
pub trait Source<T> {
    fn sample(&mut self) -> T;
}

impl<T, F: FnMut() -> T> Source<T> for F {
    fn sample(&mut self) -> T {
        self()
    }
}

/// End value of a tween: fixed up front or sampled when the tween starts.
pub enum Target<T> {
    Fixed(T),
    Dynamic(Box<dyn Source<T>>),
}

impl<T> Target<T> {
    pub fn dynamic(source: impl Source<T> + 'static) -> Self {
        Target::Dynamic(Box::new(source))
    }
}

impl<T> From<T> for Target<T> {
    fn from(value: T) -> Self {
        Target::Fixed(value)
    }
}

/// An external resource a tween is bound to. Once it reports dead the
/// tween is killed on its next tick.
pub trait Liveness {
    fn is_alive(&self) -> bool;
}

impl<T: ?Sized> Liveness for rc::Weak<T> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

impl<T: ?Sized> Liveness for sync::Weak<T> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

/// Liveness from an arbitrary predicate.
pub struct AliveWhile<F>(pub F);

impl<F: Fn() -> bool> Liveness for AliveWhile<F> {
    fn is_alive(&self) -> bool {
        (self.0)()
    }
}

type Evaluator<T> = Box<dyn Fn(&T, &T, f32) -> T>;
type Modifier<T> = Box<dyn Fn(T) -> T>;

#[derive(Default)]
struct Callbacks {
    on_start: Option<Box<dyn FnMut()>>,
    on_update: Option<Box<dyn FnMut(f32)>>,
    on_loop_complete: Option<Box<dyn FnMut()>>,
    on_complete: Option<Box<dyn FnMut()>>,
    on_kill: Option<Box<dyn FnMut()>>,
}

/// Boxed state behind a [`Value`]. This is what the pools recycle.
pub(crate) struct ValueState<T> {
    tag: Option<String>,
    phase: Phase,
    source: Option<Box<dyn Source<T>>>,
    target: Option<Target<T>>,
    a: Option<T>,
    b: Option<T>,
    progress: f32,
    duration: f32,
    inverse_duration: f32,
    delay: f32,
    delay_remaining: f32,
    easing: Easing,
    evaluator: Option<Evaluator<T>>,
    apply: Option<Box<dyn FnMut(T)>>,
    modifier: Option<Modifier<T>>,
    looping: Loop,
    cycles_remaining: i32,
    time_mode: TimeMode,
    link: Option<Box<dyn Liveness>>,
    callbacks: Callbacks,
    init_pending: bool,
    completed: bool,
    auto_kill: bool,
    recyclable: bool,
}

impl<T: Clone + 'static> ValueState<T> {
    pub(crate) fn blank() -> Self {
        Self {
            tag: None,
            phase: Phase::Idle,
            source: None,
            target: None,
            a: None,
            b: None,
            progress: 0.0,
            duration: 1.0,
            inverse_duration: 1.0,
            delay: 0.0,
            delay_remaining: 0.0,
            easing: Easing::default(),
            evaluator: None,
            apply: None,
            modifier: None,
            looping: Loop::NONE,
            cycles_remaining: 0,
            time_mode: TimeMode::Scaled,
            link: None,
            callbacks: Callbacks::default(),
            init_pending: true,
            completed: false,
            auto_kill: true,
            recyclable: true,
        }
    }

    /// Drop every closure, link and setting from the previous use.
    pub(crate) fn reset(&mut self) {
        *self = Self::blank();
    }

    pub(crate) fn is_recyclable(&self) -> bool {
        self.recyclable
    }

    /// Change the end value. Takes effect immediately once started.
    pub(crate) fn retarget(&mut self, value: T) -> bool {
        if self.phase.is_finished() {
            return false;
        }
        if self.b.is_some() {
            self.b = Some(value.clone());
        }
        self.target = Some(Target::Fixed(value));
        true
    }

    fn capture(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else { return false };
        let Some(a) = guard::guarded("sample", || source.sample()) else { return false };
        let b = match self.target.as_mut() {
            Some(Target::Fixed(value)) => value.clone(),
            Some(Target::Dynamic(target)) => match guard::guarded("target", || target.sample()) {
                Some(value) => value,
                None => return false,
            },
            None => return false,
        };
        self.a = Some(a);
        self.b = Some(b);
        true
    }

    /// Evaluate at the current progress and push the result out.
    fn render(&mut self) -> bool {
        let (Some(a), Some(b), Some(evaluate)) = (self.a.as_ref(), self.b.as_ref(), self.evaluator.as_ref()) else {
            return false;
        };
        let progress = self.progress;
        let easing = &self.easing;
        let Some(ratio) = guard::guarded("ease", || easing.evaluate(progress)) else { return false };
        let Some(mut value) = guard::guarded("evaluate", || evaluate(a, b, ratio)) else { return false };
        if let Some(modifier) = self.modifier.as_ref() {
            match guard::guarded("modifier", || modifier(value)) {
                Some(modified) => value = modified,
                None => return false,
            }
        }
        let Some(apply) = self.apply.as_mut() else { return false };
        if guard::guarded("apply", || apply(value)).is_none() {
            return false;
        }
        match self.callbacks.on_update.as_mut() {
            Some(on_update) => guard::guarded("update", || on_update(ratio)).is_some(),
            None => true,
        }
    }

    /// Also reached from `Completed` when auto-kill or `on_complete` ends the tween.
    fn die(&mut self) {
        if self.phase == Phase::Dead {
            return;
        }
        self.phase = Phase::Dead;
        guard::invoke("kill", &mut self.callbacks.on_kill);
        self.release_captures();
    }

    fn release_captures(&mut self) {
        self.source = None;
        self.target = None;
        self.evaluator = None;
        self.apply = None;
        self.modifier = None;
        self.link = None;
        self.callbacks = Callbacks::default();
    }
}

impl<T: Clone + 'static> sealed::Sealed for ValueState<T> {}

impl<T: Clone + 'static> Track for ValueState<T> {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    fn progress(&self) -> f32 {
        self.progress
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Completed => Some(Outcome::Completed),
            Phase::Dead if self.completed => Some(Outcome::Completed),
            Phase::Dead => Some(Outcome::Killed),
            _ => None,
        }
    }

    fn init(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Active;
        self.init_pending = true;
        self.progress = 0.0;
        self.delay_remaining = self.delay;
        self.cycles_remaining = self.looping.cycles;
    }

    fn tick(&mut self, time: &FrameTime) {
        if self.phase != Phase::Active {
            return;
        }
        if self.link.as_ref().is_some_and(|link| !link.is_alive()) {
            log::debug!("Linked resource dropped, killing {}", self.info().title);
            self.kill();
            return;
        }

        let mut dt = time.delta(self.time_mode);
        if self.delay_remaining > 0.0 {
            self.delay_remaining -= dt;
            if self.delay_remaining > 0.0 {
                return;
            }
            // Carry the overshoot into this tick.
            dt = -self.delay_remaining;
            self.delay_remaining = 0.0;
        }

        if self.init_pending {
            self.init_pending = false;
            if !self.capture() || !guard::invoke("start", &mut self.callbacks.on_start) {
                self.kill();
                return;
            }
        }

        if dt > 0.0 {
            self.progress = (self.progress + dt * self.inverse_duration).clamp(0.0, 1.0);
        }
        if !self.render() {
            self.kill();
            return;
        }
        if self.progress < 1.0 {
            return;
        }

        if self.looping.mode != LoopMode::None && self.cycles_remaining != 0 {
            if self.cycles_remaining > 0 {
                self.cycles_remaining -= 1;
            }
            if self.looping.mode == LoopMode::Yoyo {
                std::mem::swap(&mut self.a, &mut self.b);
            }
            self.progress = 0.0;
            self.delay_remaining = self.looping.interval;
            if !guard::invoke("loop", &mut self.callbacks.on_loop_complete) {
                self.kill();
            }
            return;
        }

        self.phase = Phase::Completed;
        if !guard::invoke("complete", &mut self.callbacks.on_complete) {
            self.die();
            return;
        }
        self.completed = true;
        if self.auto_kill {
            self.die();
        }
    }

    fn pause(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Paused;
        }
    }

    fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Active;
        }
    }

    fn kill(&mut self) {
        if !self.phase.is_finished() {
            self.die();
        }
    }

    fn terminate_loop(&mut self) {
        self.cycles_remaining = 0;
    }

    fn info(&self) -> Info {
        let name = type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        let looping = match self.looping.mode {
            LoopMode::None => "None".to_string(),
            mode if self.looping.is_infinite() => format!("{:?} (infinite)", mode),
            mode => format!("{:?} ({} left)", mode, self.cycles_remaining),
        };
        Info::new(format!("Value<{}>", short), self.phase, self.progress)
            .with_tag(self.tag.as_deref())
            .property("Duration", format!("{:.2}s", self.duration))
            .property("Delay", format!("{:.2}s", self.delay))
            .property("Ease", format!("{:?}", self.easing))
            .property("Loop", looping)
            .property("Time", format!("{:?}", self.time_mode))
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn recycle(self: Box<Self>, pools: &mut Pools) {
        pools.release(self);
    }
}

/// Fluent builder for a value element.
///
/// Construction validates its arguments; on failure a diagnostic is logged
/// and an empty value is returned, on which every builder is a no-op and
/// which the scheduler refuses to register.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use zap_tween::{Ease, Loop, Scheduler, Value};
///
/// let alpha = Rc::new(Cell::new(0.0_f32));
/// let (get, set) = (alpha.clone(), alpha.clone());
/// let fade = Value::<f32>::lerp(move || get.get(), 1.0, 0.5, move |v| set.set(v))
///     .with_ease(Ease::SineOut)
///     .with_loop(Loop::yoyo(1))
///     .with_tag("hud");
///
/// let mut scheduler = Scheduler::new();
/// scheduler.register(fade);
/// scheduler.tick(0.25);
/// assert!(alpha.get() > 0.0);
/// ```
pub struct Value<T> {
    state: Option<Box<ValueState<T>>>,
}

impl<T: Clone + 'static> Value<T> {
    /// Build a value element with a custom evaluator `(a, b, eased) -> T`.
    pub fn new(
        source: impl Source<T> + 'static,
        target: impl Into<Target<T>>,
        duration: f32,
        apply: impl FnMut(T) + 'static,
        evaluator: impl Fn(&T, &T, f32) -> T + 'static,
    ) -> Self {
        if !valid_duration::<T>(duration) {
            return Self::empty();
        }
        Self::build(Box::new(ValueState::blank()), source, target.into(), duration, apply, evaluator)
    }

    /// Like [`Value::new`], reusing a recycled state from `pools`.
    pub fn pooled(
        pools: &mut Pools,
        source: impl Source<T> + 'static,
        target: impl Into<Target<T>>,
        duration: f32,
        apply: impl FnMut(T) + 'static,
        evaluator: impl Fn(&T, &T, f32) -> T + 'static,
    ) -> Self {
        if !valid_duration::<T>(duration) {
            return Self::empty();
        }
        Self::build(pools.fetch::<T>(), source, target.into(), duration, apply, evaluator)
    }

    fn build(
        mut state: Box<ValueState<T>>,
        source: impl Source<T> + 'static,
        target: Target<T>,
        duration: f32,
        apply: impl FnMut(T) + 'static,
        evaluator: impl Fn(&T, &T, f32) -> T + 'static,
    ) -> Self {
        state.source = Some(Box::new(source));
        state.target = Some(target);
        state.duration = duration;
        state.inverse_duration = 1.0 / duration;
        state.apply = Some(Box::new(apply));
        state.evaluator = Some(Box::new(evaluator));
        Self { state: Some(state) }
    }

    /// The null-object value.
    pub fn empty() -> Self {
        Self { state: None }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none()
    }

    pub fn phase(&self) -> Phase {
        self.state.as_ref().map_or(Phase::Dead, |s| s.phase)
    }

    pub fn tag(&self) -> Option<&str> {
        self.state.as_ref().and_then(|s| s.tag.as_deref())
    }

    fn configure(mut self, f: impl FnOnce(&mut ValueState<T>)) -> Self {
        if let Some(state) = self.state.as_mut() {
            f(state);
        }
        self
    }

    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        self.configure(|s| s.tag = Some(tag.into()))
    }

    pub fn with_ease(self, ease: Ease) -> Self {
        self.configure(|s| s.easing = Easing::Ease(ease))
    }

    pub fn with_curve(self, curve: impl Curve + 'static) -> Self {
        self.configure(|s| s.easing = Easing::Curve(Rc::new(curve)))
    }

    pub fn with_easing(self, easing: Easing) -> Self {
        self.configure(|s| s.easing = easing)
    }

    /// Seconds to wait before the first cycle. Negative values become 0.
    pub fn with_delay(self, seconds: f32) -> Self {
        let delay = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.configure(|s| s.delay = delay)
    }

    pub fn with_loop(self, looping: Loop) -> Self {
        self.configure(|s| s.looping = looping)
    }

    /// Play to the end and back once, pausing `interval` seconds at the end.
    pub fn with_return_once(self, interval: f32) -> Self {
        self.with_loop(Loop::yoyo(1).with_interval(interval))
    }

    pub fn with_time_mode(self, mode: TimeMode) -> Self {
        self.configure(|s| s.time_mode = mode)
    }

    /// Kill the tween as soon as `link` reports dead.
    pub fn with_link(self, link: impl Liveness + 'static) -> Self {
        self.configure(|s| s.link = Some(Box::new(link)))
    }

    /// Default `true`. When off, a finished tween stays `Completed`.
    pub fn with_auto_kill(self, auto_kill: bool) -> Self {
        self.configure(|s| s.auto_kill = auto_kill)
    }

    /// Default `true`. When off, the state is dropped instead of pooled.
    pub fn with_recyclable(self, recyclable: bool) -> Self {
        self.configure(|s| s.recyclable = recyclable)
    }

    /// Post-process every evaluated value before it is applied.
    pub fn with_modifier(self, modifier: impl Fn(T) -> T + 'static) -> Self {
        self.configure(|s| s.modifier = Some(Box::new(modifier)))
    }

    pub fn on_start(self, f: impl FnMut() + 'static) -> Self {
        self.configure(|s| s.callbacks.on_start = Some(Box::new(f)))
    }

    /// Called after each apply with the eased ratio.
    pub fn on_update(self, f: impl FnMut(f32) + 'static) -> Self {
        self.configure(|s| s.callbacks.on_update = Some(Box::new(f)))
    }

    pub fn on_loop_complete(self, f: impl FnMut() + 'static) -> Self {
        self.configure(|s| s.callbacks.on_loop_complete = Some(Box::new(f)))
    }

    pub fn on_complete(self, f: impl FnMut() + 'static) -> Self {
        self.configure(|s| s.callbacks.on_complete = Some(Box::new(f)))
    }

    pub fn on_kill(self, f: impl FnMut() + 'static) -> Self {
        self.configure(|s| s.callbacks.on_kill = Some(Box::new(f)))
    }
}

impl<T: Lerp + Clone + 'static> Value<T> {
    /// Linear interpolation between start and end.
    pub fn lerp(
        source: impl Source<T> + 'static,
        target: impl Into<Target<T>>,
        duration: f32,
        apply: impl FnMut(T) + 'static,
    ) -> Self {
        Self::new(source, target, duration, apply, lerp_unclamped::<T>)
    }
}

impl<T: Snap + Clone + 'static> Value<T> {
    /// Round every applied value to a multiple of `step`.
    pub fn with_snap(self, step: T) -> Self {
        self.with_modifier(move |value: T| value.snap(&step))
    }
}

impl<T: Clone + 'static> From<Value<T>> for super::Element {
    fn from(value: Value<T>) -> Self {
        match value.state {
            Some(state) => super::Element::Value(state),
            None => super::Element::Empty,
        }
    }
}

fn valid_duration<T>(duration: f32) -> bool {
    if duration.is_finite() && duration > 0.0 && (1.0 / duration).is_finite() {
        return true;
    }
    log::warn!(
        "Value<{}> creation failed: invalid duration {}. Duration must be greater than 0 seconds.",
        type_name::<T>(),
        duration
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;
    use glam::Vec2;
    use std::cell::{Cell, RefCell};

    fn frame(dt: f32) -> FrameTime {
        FrameTime::uniform(dt)
    }

    /// A started f32 tween from `from` to `to` writing into the returned cell.
    fn tween(from: f32, to: f32, duration: f32) -> (Value<f32>, Rc<Cell<f32>>) {
        let cell = Rc::new(Cell::new(from));
        let (get, set) = (cell.clone(), cell.clone());
        (Value::<f32>::lerp(move || get.get(), to, duration, move |v| set.set(v)), cell)
    }

    fn start(value: impl Into<Element>) -> Element {
        let mut element = value.into();
        element.init();
        element
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_one() {
        let (value, cell) = tween(0.0, 10.0, 1.0);
        let mut element = start(value.with_auto_kill(false));
        let mut last = 0.0;
        for _ in 0..7 {
            element.tick(&frame(0.17));
            assert!(element.progress() >= last);
            last = element.progress();
        }
        assert_eq!(element.progress(), 1.0);
        assert_eq!(element.phase(), Phase::Completed);
        assert_eq!(cell.get(), 10.0);
    }

    #[test]
    fn rejects_invalid_duration() {
        let (zero, _) = tween(0.0, 1.0, 0.0);
        assert!(zero.is_empty());
        let (nan, _) = tween(0.0, 1.0, f32::NAN);
        assert!(nan.is_empty());
        assert!(Element::from(zero).is_empty());
        let (tiny, _) = tween(0.0, 1.0, 1e-39);
        assert!(tiny.is_empty(), "reciprocal overflows to infinity");
    }

    #[test]
    fn frozen_frame_leaves_progress_untouched() {
        let (value, cell) = tween(0.0, 10.0, 1e-30);
        let mut element = start(value);
        element.tick(&frame(0.0));
        assert_eq!(element.progress(), 0.0);
        assert_eq!(element.phase(), Phase::Active);
        assert!(!cell.get().is_nan());
        element.tick(&frame(0.016));
        assert_eq!(cell.get(), 10.0);
        assert_eq!(element.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn completed_value_ignores_kill() {
        let kills = Rc::new(Cell::new(0));
        let k = kills.clone();
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.with_auto_kill(false).on_kill(move || k.set(k.get() + 1)));
        element.tick(&frame(1.0));
        element.kill();
        assert_eq!(element.phase(), Phase::Completed);
        assert_eq!(element.outcome(), Some(Outcome::Completed));
        assert_eq!(kills.get(), 0);

        let k = kills.clone();
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.on_kill(move || k.set(k.get() + 1)));
        element.tick(&frame(1.0));
        element.kill();
        assert_eq!(kills.get(), 1, "auto-kill fires on_kill exactly once");
    }

    #[test]
    fn empty_builders_are_noops() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let value = Value::<f32>::empty()
            .with_tag("x")
            .with_delay(1.0)
            .with_ease(Ease::BackOut)
            .on_complete(move || f.set(true));
        assert!(value.is_empty());
        assert_eq!(value.tag(), None);
        assert_eq!(value.phase(), Phase::Dead);
        assert!(!fired.get());
    }

    #[test]
    fn extrapolates_with_overshooting_curve() {
        struct Peak;
        impl Curve for Peak {
            fn evaluate(&self, t: f32) -> f32 {
                1.1 * t
            }
        }
        let (value, cell) = tween(0.0, 10.0, 1.0);
        let mut element = start(value.with_curve(Peak));
        element.tick(&frame(1.0));
        assert!((cell.get() - 11.0).abs() < 1e-4);
    }

    #[test]
    fn back_ease_leaves_range() {
        let (value, cell) = tween(0.0, 10.0, 1.0);
        let mut element = start(value.with_ease(Ease::BackIn));
        element.tick(&frame(0.2));
        assert!(cell.get() < 0.0);
    }

    #[test]
    fn delay_overshoot_carries_into_progress() {
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.with_delay(0.3));
        element.tick(&frame(0.5));
        assert!((element.progress() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn samples_start_lazily() {
        let (value, cell) = tween(0.0, 10.0, 1.0);
        let mut element = start(value.with_delay(0.5));
        cell.set(5.0);
        element.tick(&frame(0.25));
        assert_eq!(cell.get(), 5.0, "nothing applied during delay");
        element.tick(&frame(0.25));
        element.tick(&frame(0.5));
        assert!((cell.get() - 7.5).abs() < 1e-4);
    }

    #[test]
    fn dynamic_target_sampled_at_start() {
        let goal = Rc::new(Cell::new(1.0_f32));
        let g = goal.clone();
        let out = Rc::new(Cell::new(0.0_f32));
        let o = out.clone();
        let value = Value::<f32>::lerp(|| 0.0, Target::dynamic(move || g.get()), 1.0, move |v| o.set(v));
        let mut element = start(value);
        goal.set(4.0);
        element.tick(&frame(0.5));
        goal.set(100.0);
        element.tick(&frame(0.5));
        assert_eq!(out.get(), 4.0);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let (value, cell) = tween(2.0, 8.0, 1.0);
        let loops = Rc::new(Cell::new(0));
        let l = loops.clone();
        let mut element = start(value.with_loop(Loop::yoyo(1)).on_loop_complete(move || l.set(l.get() + 1)));

        element.tick(&frame(1.0));
        assert_eq!(cell.get(), 8.0);
        assert_eq!(loops.get(), 1);
        assert_eq!(element.phase(), Phase::Active);

        element.tick(&frame(0.5));
        assert!((cell.get() - 5.0).abs() < 1e-4);
        element.tick(&frame(0.5));
        assert_eq!(cell.get(), 2.0);
        assert_eq!(element.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn restart_waits_for_interval() {
        let (value, cell) = tween(0.0, 10.0, 1.0);
        let mut element = start(value.with_loop(Loop::restart(1).with_interval(0.5)));
        element.tick(&frame(1.0));
        assert_eq!(cell.get(), 10.0);
        element.tick(&frame(0.4));
        assert_eq!(cell.get(), 10.0, "interval holds the last value");
        element.tick(&frame(0.6));
        assert!((cell.get() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn terminate_loop_finishes_current_cycle() {
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.with_loop(Loop::restart(-1)));
        element.tick(&frame(1.0));
        element.tick(&frame(0.5));
        element.terminate_loop();
        element.tick(&frame(0.5));
        assert!(element.phase().is_finished());
    }

    #[test]
    fn infinite_loop_keeps_running() {
        let (value, _) = tween(0.0, 1.0, 0.1);
        let mut element = start(value.with_loop(Loop::restart(-1)));
        for _ in 0..100 {
            element.tick(&frame(0.1));
        }
        assert_eq!(element.phase(), Phase::Active);
    }

    #[test]
    fn callbacks_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(
            value
                .on_start(move || a.borrow_mut().push("start"))
                .on_update(move |_| b.borrow_mut().push("update"))
                .on_complete(move || c.borrow_mut().push("complete"))
                .on_kill(move || d.borrow_mut().push("kill")),
        );
        element.tick(&frame(0.5));
        element.tick(&frame(0.5));
        assert_eq!(*log.borrow(), vec!["start", "update", "update", "complete", "kill"]);
        assert_eq!(element.phase(), Phase::Dead);
        assert_eq!(element.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn paused_value_keeps_progress() {
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value);
        element.tick(&frame(0.25));
        element.pause();
        element.tick(&frame(0.5));
        assert!((element.progress() - 0.25).abs() < 1e-5);
        element.resume();
        element.tick(&frame(0.25));
        assert!((element.progress() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn panicking_apply_kills() {
        let value = Value::<f32>::lerp(|| 0.0, 1.0, 1.0, |_| panic!("bad setter"));
        let mut element = start(value);
        element.tick(&frame(0.1));
        assert_eq!(element.phase(), Phase::Dead);
        assert_eq!(element.outcome(), Some(Outcome::Killed));
    }

    #[test]
    fn dropped_link_kills() {
        let owner = Rc::new(());
        let (value, cell) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.with_link(Rc::downgrade(&owner)));
        element.tick(&frame(0.5));
        drop(owner);
        element.tick(&frame(0.25));
        assert_eq!(element.outcome(), Some(Outcome::Killed));
        assert!((cell.get() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn alive_while_predicate() {
        let alive = Rc::new(Cell::new(true));
        let a = alive.clone();
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.with_link(AliveWhile(move || a.get())));
        element.tick(&frame(0.1));
        assert_eq!(element.phase(), Phase::Active);
        alive.set(false);
        element.tick(&frame(0.1));
        assert_eq!(element.phase(), Phase::Dead);
    }

    #[test]
    fn unscaled_mode_ignores_time_scale() {
        let (value, _) = tween(0.0, 1.0, 1.0);
        let mut element = start(value.with_time_mode(TimeMode::Unscaled));
        element.tick(&FrameTime { scaled: 0.0, unscaled: 0.5 });
        assert!((element.progress() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn snap_modifier_rounds_output() {
        let out = Rc::new(Cell::new(Vec2::ZERO));
        let o = out.clone();
        let value = Value::<Vec2>::lerp(|| Vec2::ZERO, Vec2::new(10.0, 10.0), 1.0, move |v| o.set(v))
            .with_snap(Vec2::new(1.0, 5.0));
        let mut element = start(value);
        element.tick(&frame(0.33));
        assert_eq!(out.get(), Vec2::new(3.0, 5.0));
    }

    #[test]
    fn retarget_changes_end_value() {
        let (value, cell) = tween(0.0, 10.0, 1.0);
        let mut element = start(value);
        element.tick(&frame(0.5));
        if let Element::Value(track) = &mut element {
            let state = track.as_any_mut().downcast_mut::<ValueState<f32>>().unwrap();
            assert!(state.retarget(20.0));
        }
        element.tick(&frame(0.5));
        assert_eq!(cell.get(), 20.0);
    }

    #[test]
    fn reset_clears_everything() {
        let (value, _) = tween(0.0, 1.0, 2.0);
        let mut state = value.with_tag("a").with_delay(3.0).on_kill(|| panic!("stale")).state.unwrap();
        state.reset();
        assert!(state.tag.is_none());
        assert!(state.source.is_none());
        assert!(state.callbacks.on_kill.is_none());
        assert_eq!(state.delay, 0.0);
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.auto_kill && state.recyclable);
    }

    #[test]
    fn info_describes_value() {
        let (value, _) = tween(0.0, 1.0, 1.0);
        let info = Element::from(value.with_tag("ui")).info();
        assert_eq!(info.title, "Value<f32>");
        assert_eq!(info.tag.as_deref(), Some("ui"));
    }
}
