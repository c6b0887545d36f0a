//! Panic boundary for user callbacks.
//!
//! A panicking callback must never unwind into the scheduler loop. The
//! caller decides what a failure means for its element (usually a kill).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `f`, returning `None` (and logging) if it panicked.
pub(crate) fn guarded<R>(what: &str, f: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            log::error!("{} callback panicked: {}", what, panic_message(payload.as_ref()));
            None
        }
    }
}

/// Run an optional callback. `true` when it is absent or returned normally.
pub(crate) fn invoke(what: &str, callback: &mut Option<Box<dyn FnMut()>>) -> bool {
    match callback {
        Some(f) => guarded(what, || f()).is_some(),
        None => true,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_value_on_success() {
        assert_eq!(guarded("test", || 7), Some(7));
    }

    #[test]
    fn swallows_panic() {
        let result: Option<()> = guarded("test", || panic!("boom"));
        assert!(result.is_none());
    }

    #[test]
    fn invoke_missing_callback_is_ok() {
        let mut none: Option<Box<dyn FnMut()>> = None;
        assert!(invoke("test", &mut none));
        let mut failing: Option<Box<dyn FnMut()>> = Some(Box::new(|| panic!("nope")));
        assert!(!invoke("test", &mut failing));
    }

    #[test]
    fn extracts_formatted_message() {
        let payload = panic::catch_unwind(|| panic!("value {}", 3)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "value 3");
    }
}
