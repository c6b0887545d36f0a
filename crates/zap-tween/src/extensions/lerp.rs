// extensions/lerp.rs
//
// Unclamped interpolation for the value types tweens animate.
// Ratios outside [0, 1] extrapolate, so overshooting easings keep their shape.

use glam::{Quat, Vec2, Vec3, Vec4};

/// Linearly interpolate between two values without clamping `t`.
pub trait Lerp {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for f64 {
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t as f64
    }
}

macro_rules! impl_lerp_for_vec {
    ($($ty:ty),*) => {
        $(
            impl Lerp for $ty {
                #[inline]
                fn lerp(&self, to: &Self, t: f32) -> Self {
                    *self + (*to - *self) * t
                }
            }
        )*
    };
}

impl_lerp_for_vec!(Vec2, Vec3, Vec4);

impl Lerp for Quat {
    /// Normalized lerp along the shortest arc.
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let to = if self.dot(*to) < 0.0 { -*to } else { *to };
        let blended = *self * (1.0 - t) + to * t;
        blended.normalize()
    }
}

/// Evaluator for any [`Lerp`] type, in the shape `Value` expects.
#[inline]
pub fn lerp_unclamped<T: Lerp>(a: &T, b: &T, t: f32) -> T {
    a.lerp(b, t)
}

// ── Snapping ─────────────────────────────────────────────────────────────

#[inline]
fn step(value: f32, step: f32) -> f32 {
    if step <= 0.0 { value } else { (value / step).round() * step }
}

/// Round every component to a multiple of `step`.
/// A step component ≤ 0 leaves that component untouched.
pub trait Snap: Sized {
    fn snap(self, step: &Self) -> Self;
}

impl Snap for f32 {
    fn snap(self, s: &Self) -> Self {
        step(self, *s)
    }
}

impl Snap for Vec2 {
    fn snap(self, s: &Self) -> Self {
        Vec2::new(step(self.x, s.x), step(self.y, s.y))
    }
}

impl Snap for Vec3 {
    fn snap(self, s: &Self) -> Self {
        Vec3::new(step(self.x, s.x), step(self.y, s.y), step(self.z, s.z))
    }
}

impl Snap for Vec4 {
    fn snap(self, s: &Self) -> Self {
        Vec4::new(step(self.x, s.x), step(self.y, s.y), step(self.z, s.z), step(self.w, s.w))
    }
}
