use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of simulation ticks since the game started.
///
/// Incremented once at the end of every tick so that all systems running in
/// the same tick observe the same value.
#[derive(Resource, Default, Reflect, Hash, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[reflect(Hash)]
pub struct FrameCount {
    pub frame: u32,
}

impl FrameCount {
    pub fn advance(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }
}

impl std::fmt::Display for FrameCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}|{}", self.frame, self.frame % 60)
    }
}
