//! WASM bridge for zap-tween.
//!
//! One [`TweenRunner`] per page lives in a `thread_local!`; the free
//! functions below are the `#[wasm_bindgen]` surface the page calls.
//! Call `tweens_init()` once, then `tweens_tick(dt)` from
//! `requestAnimationFrame` for as long as it returns `true`.

pub mod runner;

pub use runner::TweenRunner;

use std::cell::RefCell;

use js_sys::Function;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<TweenRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Outside `tweens_init()` or from inside a
/// tween callback the call is reported and `R::default()` returned.
fn with_runner<R: Default>(what: &str, f: impl FnOnce(&mut TweenRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let Ok(mut borrow) = cell.try_borrow_mut() else {
            log::error!("{}: called from inside a tween callback, ignored", what);
            return R::default();
        };
        match borrow.as_mut() {
            Some(runner) => f(runner),
            None => {
                web_sys::console::error_1(&format!("{}: tweens not initialized. Call tweens_init() first.", what).into());
                R::default()
            }
        }
    })
}

fn read_number(get: &Function) -> f32 {
    match get.call0(&JsValue::NULL) {
        Ok(value) => value.as_f64().unwrap_or(0.0) as f32,
        Err(e) => {
            log::error!("Tween getter threw: {:?}", e);
            0.0
        }
    }
}

fn write_number(apply: &Function, value: f32) {
    if let Err(e) = apply.call1(&JsValue::NULL, &JsValue::from_f64(value as f64)) {
        log::error!("Tween setter threw: {:?}", e);
    }
}

#[wasm_bindgen]
pub fn tweens_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = match config_json.as_deref() {
        Some(json) => TweenRunner::from_json(json),
        None => TweenRunner::default(),
    };
    RUNNER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => *slot = Some(runner),
        Err(_) => log::error!("tweens_init: called from inside a tween callback, ignored"),
    });
    log::info!("zap-tween: initialized");
}

/// Returns whether another frame is needed.
#[wasm_bindgen]
pub fn tweens_tick(dt: f32) -> bool {
    with_runner("tweens_tick", |r| r.tick(dt))
}

/// Returns a handle, or 0 if the tween was rejected.
#[wasm_bindgen]
pub fn tween_number(get: Function, target: f32, duration: f32, ease: u32, apply: Function, tag: Option<String>) -> u32 {
    with_runner("tween_number", |r| {
        r.tween_number(move || read_number(&get), target, duration, ease, move |v| write_number(&apply, v), tag)
    })
}

#[wasm_bindgen]
pub fn tween_delay(seconds: f32, tag: Option<String>) -> u32 {
    with_runner("tween_delay", |r| r.delay(seconds, tag))
}

// ---- Bulk control (no tag = everything) ----

#[wasm_bindgen]
pub fn tweens_pause(tag: Option<String>) -> u32 {
    with_runner("tweens_pause", |r| r.pause(tag.as_deref()))
}

#[wasm_bindgen]
pub fn tweens_resume(tag: Option<String>) -> u32 {
    with_runner("tweens_resume", |r| r.resume(tag.as_deref()))
}

#[wasm_bindgen]
pub fn tweens_kill(tag: Option<String>) -> u32 {
    with_runner("tweens_kill", |r| r.kill(tag.as_deref()))
}

#[wasm_bindgen]
pub fn tweens_set_time_scale(scale: f32) {
    with_runner("tweens_set_time_scale", |r| r.set_time_scale(scale));
}

#[wasm_bindgen]
pub fn tweens_shutdown() {
    with_runner("tweens_shutdown", |r| r.shutdown());
}

// ---- Per-handle control ----

#[wasm_bindgen]
pub fn tween_pause(id: u32) -> bool {
    with_runner("tween_pause", |r| r.pause_id(id))
}

#[wasm_bindgen]
pub fn tween_resume(id: u32) -> bool {
    with_runner("tween_resume", |r| r.resume_id(id))
}

#[wasm_bindgen]
pub fn tween_kill(id: u32) -> bool {
    with_runner("tween_kill", |r| r.kill_id(id))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_tween_events_ptr() -> *const u32 {
    with_runner("get_tween_events_ptr", |r| Some(r.events_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_tween_events_len() -> u32 {
    with_runner("get_tween_events_len", |r| r.events_len())
}

#[wasm_bindgen]
pub fn get_active_tweens() -> String {
    with_runner("get_active_tweens", |r| r.active_tweens_json())
}
