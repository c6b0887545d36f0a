// extensions/curve.rs
//
// Keyframe curves: authored easing shapes evaluated with cubic Hermite
// segments. Loadable from JSON.

use serde::{Deserialize, Serialize};

use super::easing::Curve;

/// A single control point of a [`KeyframeCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key.
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key.
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    /// A flat key (zero tangents).
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value, in_tangent: 0.0, out_tangent: 0.0 }
    }

    pub const fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self { time, value, in_tangent, out_tangent }
    }
}

/// Piecewise cubic Hermite curve through a set of keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Build from keys in any order. Keys with non-finite time are dropped.
    pub fn new(keys: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut keys: Vec<Keyframe> = keys.into_iter().filter(|k| k.time.is_finite()).collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Parse a curve from a JSON array of keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let keys: Vec<Keyframe> = serde_json::from_str(json)?;
        Ok(Self::new(keys))
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve. Outside the key range the nearest end value is held.
    pub fn sample(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return t,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; exists because t < last.time.
        let hi = self.keys.partition_point(|k| k.time <= t);
        let k0 = &self.keys[hi - 1];
        let k1 = &self.keys[hi];
        hermite(k0, k1, t)
    }
}

impl Curve for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        self.sample(t)
    }
}

#[inline]
fn hermite(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    let span = k1.time - k0.time;
    if span <= 0.0 {
        return k1.value;
    }
    let s = (t - k0.time) / span;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * span * k0.out_tangent + h01 * k1.value + h11 * span * k1.in_tangent
}

// ── Presets ──────────────────────────────────────────────────────────────

/// Dips below zero before heading to 1.
pub fn anticipate() -> KeyframeCurve {
    KeyframeCurve::new([Keyframe::new(0.0, 0.0), Keyframe::new(0.3, -0.3), Keyframe::new(1.0, 1.0)])
}

/// Slow build-up with a quick pop at the end.
pub fn pop() -> KeyframeCurve {
    KeyframeCurve::new([
        Keyframe::new(0.0, 0.0),
        Keyframe::with_tangents(0.6, 0.05, 0.25, 0.75),
        Keyframe::with_tangents(0.85, 0.9, 1.25, 1.25),
        Keyframe::new(1.0, 1.0),
    ])
}

/// Decaying oscillation that returns to 0. Pair with a relative target.
pub fn punch() -> KeyframeCurve {
    KeyframeCurve::new([
        Keyframe::new(0.0, 0.0),
        Keyframe::new(0.1, 1.0),
        Keyframe::new(0.25, -0.6),
        Keyframe::new(0.5, 0.4),
        Keyframe::new(0.7, -0.2),
        Keyframe::new(1.0, 0.0),
    ])
}

/// Evenly spaced jitter that settles back to 0.
pub fn shake() -> KeyframeCurve {
    KeyframeCurve::new([
        Keyframe::new(0.0, 0.0),
        Keyframe::new(0.1, 0.5),
        Keyframe::new(0.2, -0.5),
        Keyframe::new(0.3, 0.4),
        Keyframe::new(0.4, -0.4),
        Keyframe::new(0.5, 0.3),
        Keyframe::new(0.6, -0.3),
        Keyframe::new(0.7, 0.2),
        Keyframe::new(0.8, -0.2),
        Keyframe::new(0.9, 0.1),
        Keyframe::new(1.0, 0.0),
    ])
}

/// Fast approach, slight overshoot, settle.
pub fn snappy() -> KeyframeCurve {
    KeyframeCurve::new([
        Keyframe::new(0.0, 0.0),
        Keyframe::with_tangents(0.3, 1.05, 0.75, 0.75),
        Keyframe::new(0.6, 0.95),
        Keyframe::new(1.0, 1.0),
    ])
}

/// Springy overshoots around the target.
pub fn spring() -> KeyframeCurve {
    KeyframeCurve::new([
        Keyframe::new(0.0, 0.0),
        Keyframe::new(0.3, 1.3),
        Keyframe::new(0.6, 0.8),
        Keyframe::new(0.8, 1.05),
        Keyframe::new(1.0, 1.0),
    ])
}
