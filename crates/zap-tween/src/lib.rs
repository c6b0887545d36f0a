pub mod api;
pub mod core;
pub mod elements;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::info::{Info, Property};
pub use api::types::{TweenEvent, TweenId};
pub use core::config::SchedulerConfig;
pub use core::pool::Pools;
pub use core::scheduler::{Scheduler, Spawner};
pub use core::time::{Clock, FrameTime, TimeMode};
pub use elements::{
    AliveWhile, Callback, Delay, Element, Liveness, Loop, LoopMode, Outcome, Parallel, Phase, Sequence, Source,
    Target, Track, Value,
};
pub use extensions::{lerp_unclamped, Curve, Ease, Easing, Keyframe, KeyframeCurve, Lerp, Snap};
