// extensions/easing.rs
//
// Pure easing functions for tween interpolation (Penner curves),
// plus the `Curve` seam for externally authored curves.
// No state, just math.

use std::f32::consts::PI;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Overshoot amount for Back easing.
pub const BACK_S: f32 = 1.70158;
/// Overshoot for the InOut Back transition.
pub const BACK_C2: f32 = BACK_S * 1.525;
/// Amplified overshoot used by BackIn/BackOut.
pub const BACK_C3: f32 = BACK_S + 1.0;
/// Angular frequency for ElasticIn/ElasticOut.
pub const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
/// Angular frequency for ElasticInOut.
pub const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;
/// Bounce scale.
pub const BOUNCE_N1: f32 = 7.5625;
/// Bounce phase division.
pub const BOUNCE_D1: f32 = 2.75;

/// Built-in easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Ease {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    /// Exponential easing (dramatic).
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    /// Overshoot then settle. Leaves [0, 1].
    BackIn,
    BackOut,
    BackInOut,
    /// Elastic spring. Leaves [0, 1].
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Ease {
    /// Every built-in curve, in declaration order.
    pub const ALL: [Ease; 31] = [
        Ease::Linear,
        Ease::SineIn,
        Ease::SineOut,
        Ease::SineInOut,
        Ease::QuadIn,
        Ease::QuadOut,
        Ease::QuadInOut,
        Ease::CubicIn,
        Ease::CubicOut,
        Ease::CubicInOut,
        Ease::QuartIn,
        Ease::QuartOut,
        Ease::QuartInOut,
        Ease::QuintIn,
        Ease::QuintOut,
        Ease::QuintInOut,
        Ease::ExpoIn,
        Ease::ExpoOut,
        Ease::ExpoInOut,
        Ease::CircIn,
        Ease::CircOut,
        Ease::CircInOut,
        Ease::BackIn,
        Ease::BackOut,
        Ease::BackInOut,
        Ease::ElasticIn,
        Ease::ElasticOut,
        Ease::ElasticInOut,
        Ease::BounceIn,
        Ease::BounceOut,
        Ease::BounceInOut,
    ];

    /// Look up a curve by its position in [`Ease::ALL`] (used by host bridges).
    pub fn from_index(index: u32) -> Option<Ease> {
        Self::ALL.get(index as usize).copied()
    }

    /// Apply the easing function to a normalized time value `t`.
    /// `t` is clamped to [0, 1]; the result is not (Back/Elastic overshoot).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,

            // Sine
            Ease::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            // Quadratic
            Ease::QuadIn => t * t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            // Cubic
            Ease::CubicIn => t * t * t,
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
            Ease::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            // Quartic
            Ease::QuartIn => t * t * t * t,
            Ease::QuartOut => 1.0 - (1.0 - t).powi(4),
            Ease::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }

            // Quintic
            Ease::QuintIn => t * t * t * t * t,
            Ease::QuintOut => 1.0 - (1.0 - t).powi(5),
            Ease::QuintInOut => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }

            // Exponential
            Ease::ExpoIn => {
                if t == 0.0 { 0.0 } else { 2.0_f32.powf(10.0 * t - 10.0) }
            }
            Ease::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
            Ease::ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            // Circular
            Ease::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Ease::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Ease::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - 4.0 * t * t).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            // Back (overshoot)
            Ease::BackIn => BACK_C3 * t * t * t - BACK_S * t * t,
            Ease::BackOut => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_S * (t - 1.0).powi(2),
            Ease::BackInOut => {
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0) / 2.0
                }
            }

            // Elastic
            Ease::ElasticIn => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2.0_f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Ease::ElasticOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Ease::ElasticInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    -(2.0_f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    2.0_f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin() / 2.0 + 1.0
                }
            }

            // Bounce
            Ease::BounceIn => 1.0 - bounce_out(1.0 - t),
            Ease::BounceOut => bounce_out(t),
            Ease::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

#[inline]
fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

// ── Authored curves ──────────────────────────────────────────────────────

/// An externally authored easing curve.
///
/// Receives normalized progress in [0, 1]; may return values outside [0, 1].
pub trait Curve {
    fn evaluate(&self, t: f32) -> f32;
}

/// The easing a tween uses: a built-in curve or an authored one.
#[derive(Clone)]
pub enum Easing {
    Ease(Ease),
    Curve(Rc<dyn Curve>),
}

impl Easing {
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            Easing::Ease(ease) => ease.apply(t),
            Easing::Curve(curve) => curve.evaluate(t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Ease(Ease::Linear)
    }
}

impl From<Ease> for Easing {
    fn from(ease: Ease) -> Self {
        Easing::Ease(ease)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Ease(ease) => write!(f, "{:?}", ease),
            Easing::Curve(_) => f.write_str("Curve"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Ease::Linear.apply(0.0), 0.0);
        assert_eq!(Ease::Linear.apply(1.0), 1.0);
        assert_eq!(Ease::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn every_curve_hits_endpoints() {
        for ease in Ease::ALL {
            assert!(ease.apply(0.0).abs() < 1e-4, "{:?} at 0 = {}", ease, ease.apply(0.0));
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-4, "{:?} at 1 = {}", ease, ease.apply(1.0));
        }
    }

    #[test]
    fn quad_out_faster_start() {
        let mid = Ease::QuadOut.apply(0.5);
        assert!(mid > 0.5, "QuadOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.05, "BackOut should overshoot, peak {}", peak);
    }

    #[test]
    fn back_in_undershoots() {
        assert!(Ease::BackIn.apply(0.2) < 0.0);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::QuadIn.apply(2.0), 1.0);
        assert_eq!(Ease::QuadIn.apply(-1.0), 0.0);
    }

    #[test]
    fn from_index_round_trips_all() {
        for (i, ease) in Ease::ALL.iter().enumerate() {
            assert_eq!(Ease::from_index(i as u32), Some(*ease));
        }
        assert_eq!(Ease::from_index(31), None);
    }

    #[test]
    fn custom_curve_is_not_clamped() {
        struct Spike;
        impl Curve for Spike {
            fn evaluate(&self, t: f32) -> f32 {
                t * 3.0
            }
        }
        let easing = Easing::Curve(Rc::new(Spike));
        assert_eq!(easing.evaluate(0.5), 1.5);
    }
}
