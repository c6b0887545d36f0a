use serde::{Deserialize, Serialize};

/// Scheduler settings. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum number of registered root elements (default: 64).
    pub max_tweens: usize,
    /// Multiplier for scaled time (default: 1.0).
    pub time_scale: f32,
    /// Pooled value states kept per value type (default: 64).
    pub pool_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_tweens: 64,
            time_scale: 1.0,
            pool_limit: 64,
        }
    }
}

impl SchedulerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
