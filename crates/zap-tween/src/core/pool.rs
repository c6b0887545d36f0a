// core/pool.rs
//
// Free lists of value states, one per value type. States are reset on
// the way in and on the way out, so nothing from a previous tween (tag,
// closures, link, callbacks) can reach the next one.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::elements::value::ValueState;

pub struct Pools {
    lists: HashMap<TypeId, Box<dyn Any>>,
    /// Upper bound per type; extra states are dropped.
    limit: usize,
}

impl Pools {
    pub fn new(limit: usize) -> Self {
        Self { lists: HashMap::new(), limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of pooled states ready for `T`.
    pub fn available<T: Clone + 'static>(&self) -> usize {
        self.lists
            .get(&TypeId::of::<T>())
            .and_then(|list| list.downcast_ref::<Vec<Box<ValueState<T>>>>())
            .map_or(0, Vec::len)
    }

    /// Drop every pooled state.
    pub fn clear(&mut self) {
        self.lists.clear();
    }

    pub(crate) fn fetch<T: Clone + 'static>(&mut self) -> Box<ValueState<T>> {
        match self.list_mut::<T>().and_then(Vec::pop) {
            Some(mut state) => {
                state.reset();
                state
            }
            None => Box::new(ValueState::blank()),
        }
    }

    pub(crate) fn release<T: Clone + 'static>(&mut self, mut state: Box<ValueState<T>>) {
        if !state.is_recyclable() {
            return;
        }
        state.reset();
        let limit = self.limit;
        if let Some(list) = self.list_mut::<T>() {
            if list.len() < limit {
                list.push(state);
            }
        }
    }

    fn list_mut<T: Clone + 'static>(&mut self) -> Option<&mut Vec<Box<ValueState<T>>>> {
        self.lists
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Vec::<Box<ValueState<T>>>::new()))
            .downcast_mut()
    }
}

impl Default for Pools {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FrameTime;
    use crate::elements::{Element, Phase, Value};
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn run_to_end(value: Value<f32>) -> Element {
        let mut element = Element::from(value);
        element.init();
        element.tick(&FrameTime::uniform(10.0));
        element
    }

    #[test]
    fn released_state_is_reused() {
        let mut pools = Pools::new(8);
        let element = run_to_end(Value::<f32>::pooled(&mut pools, || 0.0, 1.0, 1.0, |_| {}, |a, b, t| a + (b - a) * t));
        assert_eq!(element.phase(), Phase::Dead);
        element.recycle(&mut pools);
        assert_eq!(pools.available::<f32>(), 1);
        assert_eq!(pools.available::<Vec2>(), 0);

        let _reused = Value::<f32>::pooled(&mut pools, || 0.0, 1.0, 1.0, |_| {}, |a, _, _| *a);
        assert_eq!(pools.available::<f32>(), 0);
    }

    #[test]
    fn stale_callbacks_never_fire_after_reuse() {
        let mut pools = Pools::new(8);
        let stale = Rc::new(Cell::new(0));
        let s = stale.clone();
        let mut first = Element::from(
            Value::<f32>::pooled(&mut pools, || 0.0, 1.0, 1.0, |_| {}, |a, _, _| *a)
                .with_tag("first")
                .with_auto_kill(false)
                .on_complete(move || s.set(s.get() + 1)),
        );
        first.init();
        first.tick(&FrameTime::uniform(1.0));
        assert_eq!(stale.get(), 1);
        first.recycle(&mut pools);

        let fresh = Rc::new(Cell::new(0));
        let f = fresh.clone();
        let second = Value::<f32>::pooled(&mut pools, || 0.0, 1.0, 1.0, |_| {}, |a, _, _| *a).on_complete(move || f.set(1));
        assert_eq!(second.tag(), None);
        let mut second = Element::from(second);
        second.init();
        second.tick(&FrameTime::uniform(1.0));
        assert_eq!(fresh.get(), 1);
        assert_eq!(stale.get(), 1);
    }

    #[test]
    fn non_recyclable_states_are_dropped() {
        let mut pools = Pools::new(8);
        run_to_end(Value::<f32>::lerp(|| 0.0, 1.0, 1.0, |_| {}).with_recyclable(false)).recycle(&mut pools);
        assert_eq!(pools.available::<f32>(), 0);
    }

    #[test]
    fn respects_limit() {
        let mut pools = Pools::new(2);
        for _ in 0..5 {
            run_to_end(Value::<f32>::lerp(|| 0.0, 1.0, 1.0, |_| {})).recycle(&mut pools);
        }
        assert_eq!(pools.available::<f32>(), 2);
    }
}
