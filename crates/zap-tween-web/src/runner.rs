use serde::Serialize;
use zap_tween::{
    Delay, Ease, Element, Info, Scheduler, SchedulerConfig, TweenEvent, TweenId, Value,
};

/// Owns the scheduler for a page and exposes it in host-friendly terms:
/// plain `u32` handles (0 = rejected) and a flat event buffer the page reads
/// after each tick.
pub struct TweenRunner {
    scheduler: Scheduler,
    /// Events from the most recent tick.
    events: Vec<TweenEvent>,
}

#[derive(Serialize)]
struct ActiveTween<'a> {
    id: u32,
    #[serde(flatten)]
    info: &'a Info,
}

impl TweenRunner {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            scheduler: Scheduler::with_config(config),
            events: Vec::new(),
        }
    }

    /// Build from a JSON config; malformed JSON falls back to defaults.
    pub fn from_json(json: &str) -> Self {
        let config = match SchedulerConfig::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid tween config ({}), using defaults", e);
                SchedulerConfig::default()
            }
        };
        Self::new(config)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Run one frame. Returns whether another frame is needed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.events.clear();
        self.scheduler.tick(dt);
        self.events.extend(self.scheduler.drain_events());
        self.needs_tick()
    }

    /// `false` once nothing is registered; the page can stop its frame loop.
    pub fn needs_tick(&self) -> bool {
        self.scheduler.is_ticking()
    }

    pub fn register(&mut self, element: impl Into<Element>) -> u32 {
        self.scheduler.register(element).map_or(0, |id| id.0)
    }

    /// Tween a number from whatever `get` returns at start toward `target`.
    /// `ease` indexes [`Ease::ALL`]; unknown indices fall back to linear.
    pub fn tween_number(
        &mut self,
        get: impl FnMut() -> f32 + 'static,
        target: f32,
        duration: f32,
        ease: u32,
        apply: impl FnMut(f32) + 'static,
        tag: Option<String>,
    ) -> u32 {
        let ease = Ease::from_index(ease).unwrap_or_else(|| {
            log::warn!("Unknown ease index {}, using Linear", ease);
            Ease::Linear
        });
        let mut value = Value::<f32>::lerp(get, target, duration, apply).with_ease(ease);
        if let Some(tag) = tag {
            value = value.with_tag(tag);
        }
        self.register(value)
    }

    pub fn delay(&mut self, seconds: f32, tag: Option<String>) -> u32 {
        let mut delay = Delay::new(seconds);
        if let Some(tag) = tag {
            delay = delay.with_tag(tag);
        }
        self.register(delay)
    }

    pub fn pause(&mut self, tag: Option<&str>) -> u32 {
        self.scheduler.pause(tag) as u32
    }

    pub fn resume(&mut self, tag: Option<&str>) -> u32 {
        self.scheduler.resume(tag) as u32
    }

    pub fn kill(&mut self, tag: Option<&str>) -> u32 {
        let killed = self.scheduler.kill(tag) as u32;
        self.events.extend(self.scheduler.drain_events());
        killed
    }

    pub fn pause_id(&mut self, id: u32) -> bool {
        self.scheduler.pause_id(TweenId(id))
    }

    pub fn resume_id(&mut self, id: u32) -> bool {
        self.scheduler.resume_id(TweenId(id))
    }

    pub fn kill_id(&mut self, id: u32) -> bool {
        let killed = self.scheduler.kill_id(TweenId(id));
        self.events.extend(self.scheduler.drain_events());
        killed
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.scheduler.set_time_scale(scale);
    }

    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
        self.events.clear();
    }

    // ---- Event buffer (read directly from wasm memory) ----

    pub fn events(&self) -> &[TweenEvent] {
        &self.events
    }

    pub fn events_ptr(&self) -> *const u32 {
        self.events.as_ptr() as *const u32
    }

    /// Number of events; each spans `TweenEvent::WORDS` words.
    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    /// JSON array describing every registered tween.
    pub fn active_tweens_json(&self) -> String {
        let snapshot = self.scheduler.snapshot();
        let active: Vec<ActiveTween> = snapshot.iter().map(|(id, info)| ActiveTween { id: id.0, info }).collect();
        serde_json::to_string(&active).unwrap_or_else(|e| {
            log::error!("Failed to serialize active tweens: {}", e);
            "[]".to_string()
        })
    }
}

impl Default for TweenRunner {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
