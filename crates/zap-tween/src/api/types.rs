use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::elements::Outcome;

/// Handle to a registered root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweenId(pub u32);

/// Emitted once per root element when it leaves the scheduler.
/// Plain-old-data so hosts can read the buffer directly.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TweenEvent {
    pub id: u32,
    pub kind: u32,
}

impl TweenEvent {
    pub const COMPLETED: u32 = 1;
    pub const KILLED: u32 = 2;
    /// `u32` words per event.
    pub const WORDS: usize = 2;

    pub fn new(id: TweenId, outcome: Outcome) -> Self {
        let kind = match outcome {
            Outcome::Completed => Self::COMPLETED,
            Outcome::Killed => Self::KILLED,
        };
        Self { id: id.0, kind }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.kind {
            Self::COMPLETED => Some(Outcome::Completed),
            Self::KILLED => Some(Outcome::Killed),
            _ => None,
        }
    }
}
