use bevy::prelude::SystemSet;

/// Stages of one gameplay tick, chained in this order in `Update`.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum WaveSystemSet {
    Setup,
    DeathManagement,
    Shop,
    Orchestration,
    Presentation,
    FrameCounter,
}
