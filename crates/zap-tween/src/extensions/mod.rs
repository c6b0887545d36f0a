// Extensions: easing curves and interpolation helpers used by value elements.
// Independent of the scheduler; usable on their own.

pub mod curve;
pub mod easing;
pub mod lerp;

pub use curve::{Keyframe, KeyframeCurve};
pub use easing::{Curve, Ease, Easing};
pub use lerp::{lerp_unclamped, Lerp, Snap};
