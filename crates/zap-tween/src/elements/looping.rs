use serde::{Deserialize, Serialize};

/// What happens when a value element reaches the end of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Play once.
    #[default]
    None,
    /// Jump back to the start value.
    Restart,
    /// Swap start and end, playing back the way it came.
    Yoyo,
}

/// Loop configuration for a value element.
///
/// `cycles` counts the *extra* cycles after the first; `-1` loops forever.
/// `interval` is a pause inserted before each extra cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loop {
    pub mode: LoopMode,
    pub cycles: i32,
    pub interval: f32,
}

impl Default for Loop {
    fn default() -> Self {
        Self::NONE
    }
}

impl Loop {
    pub const NONE: Loop = Loop { mode: LoopMode::None, cycles: 0, interval: 0.0 };

    /// Negative cycle counts normalize to infinite; invalid intervals to 0.
    pub fn new(mode: LoopMode, cycles: i32, interval: f32) -> Self {
        Self {
            mode,
            cycles: if cycles < 0 { -1 } else { cycles },
            interval: if interval.is_finite() && interval > 0.0 { interval } else { 0.0 },
        }
    }

    pub fn restart(cycles: i32) -> Self {
        Self::new(LoopMode::Restart, cycles, 0.0)
    }

    pub fn yoyo(cycles: i32) -> Self {
        Self::new(LoopMode::Yoyo, cycles, 0.0)
    }

    pub fn with_interval(self, seconds: f32) -> Self {
        Self::new(self.mode, self.cycles, seconds)
    }

    pub fn is_infinite(&self) -> bool {
        self.mode != LoopMode::None && self.cycles < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_inputs() {
        let l = Loop::new(LoopMode::Restart, -7, f32::NAN);
        assert_eq!(l.cycles, -1);
        assert_eq!(l.interval, 0.0);
        assert!(l.is_infinite());
    }

    #[test]
    fn none_is_never_infinite() {
        assert!(!Loop::NONE.is_infinite());
        assert!(!Loop::new(LoopMode::None, -1, 0.0).is_infinite());
        assert!(Loop::yoyo(-1).is_infinite());
    }

    #[test]
    fn parse_partial_json() {
        let l: Loop = serde_json::from_str(r#"{ "mode": "Yoyo", "cycles": 2 }"#).unwrap();
        assert_eq!(l, Loop::yoyo(2));
    }
}
