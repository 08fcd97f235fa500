//! Wave progression state shared by the wave task, the death handlers and
//! the progress display.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::enemy::EnemyKind;

use super::config::WaveConfigError;

/// Current phase of the wave task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Reflect)]
pub enum WavePhase {
    /// Not started yet
    #[default]
    Idle,
    /// Waiting before the next wave starts spawning
    InterWaveDelay,
    /// Spawning the entries of the current wave
    Spawning,
    /// Everything spawned, waiting for the last enemy to die
    AwaitingClear,
    /// Moving the player into the shop
    ShopEnter,
    /// Waiting for the player to leave the shop
    AwaitingShopExit,
    /// Every wave was cleared
    Completed,
}

/// Counters of the running wave.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveProgress {
    /// Index of the current wave (0-based)
    pub wave_index: usize,
    /// Enemies of the current wave scheduled or spawned and not dead yet
    pub enemies_alive: u32,
    /// Enemies the current wave asked for, unresolvable entries included
    pub wave_total: u32,
    pub total_killed: u32,
}

impl WaveProgress {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 1-based number of the current wave, for display.
    pub fn wave_number(&self) -> usize {
        self.wave_index + 1
    }

    pub fn begin_wave(&mut self, wave_index: usize, total: u32) {
        self.wave_index = wave_index;
        self.wave_total = total;
        self.enemies_alive = total;
    }

    /// Drops enemies that will never spawn from the live count.
    pub fn forget(&mut self, count: u32) {
        self.enemies_alive = self.enemies_alive.saturating_sub(count);
    }

    /// Counts the death of an enemy spawned by wave `wave_index`. Enemies of
    /// another wave do not touch the live count.
    pub fn record_death(&mut self, wave_index: usize) -> bool {
        self.total_killed += 1;
        self.release(wave_index)
    }

    /// Removes an enemy of wave `wave_index` from the live count without
    /// counting a kill.
    pub fn release(&mut self, wave_index: usize) -> bool {
        if wave_index != self.wave_index || self.enemies_alive == 0 {
            return false;
        }
        self.enemies_alive -= 1;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    Misconfigured(WaveConfigError),
    ConfigUnavailable(String),
    Disabled,
    GameOver,
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::Misconfigured(err) => write!(f, "misconfigured: {}", err),
            HaltReason::ConfigUnavailable(err) => write!(f, "wave config unavailable: {}", err),
            HaltReason::Disabled => f.write_str("wave mode disabled"),
            HaltReason::GameOver => f.write_str("player died"),
        }
    }
}

/// What the progress display should show.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum WaveProgressUpdate {
    Preparing { number: usize },
    Wave { number: usize, total: usize, remaining: u32 },
    EnemiesRemaining { remaining: u32 },
    Completed,
    Halted { reason: HaltReason },
    GameOver,
}

/// Recoverable problems met while running the waves. Each one is also logged.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum WaveAnomaly {
    /// A wave entry names no enemy type the table knows and there is no default.
    UnresolvableEntry {
        wave: usize,
        requested: Option<EnemyKind>,
        count: u32,
    },
    SpawnFailed { wave: usize, kind: EnemyKind },
    MissingReward { kind: EnemyKind },
    MissingShopGate { wave: usize },
    MissingPlayer { wave: usize },
    ShopExitTimeout { wave: usize, waited_frames: u32 },
    /// A wave enemy left the world without dying.
    EnemyVanished { entity: Entity, wave: usize },
}
