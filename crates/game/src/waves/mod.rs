//! Wave progression for the survival mode.
//!
//! # Wave Flow
//!
//! ```text
//! Idle → InterWaveDelay → Spawning → AwaitingClear → ShopEnter → AwaitingShopExit
//!             ↑                                                        │
//!             └──────────────────────── next wave ─────────────────────┴→ Completed
//! ```
//!
//! Every spawned enemy is registered in the [`lifecycle::LifecycleRegistry`];
//! its death decrements the live count of its wave and pays its reward. Once
//! the live count reaches zero the player is sent to the shop and the task
//! polls the [`crate::shop::ShopGate`] until the player leaves or the stay
//! times out.
//!
//! # Configuration
//!
//! Configure via `assets/waves/*.waves.ron`. See [`config::WaveConfig`].

pub mod config;
pub mod lifecycle;
pub mod orchestrator;
pub mod state;
pub mod systems;
pub mod task;
pub mod tracking;

use bevy::prelude::*;

use crate::{
    character::{
        enemy::spawning::{discover_spawn_points_system, SpawnPointPool},
        health::{apply_damage_system, despawn_corpses_system},
    },
    system_set::WaveSystemSet,
};

pub use config::{WaveConfig, WaveSchedule, WaveTimings};
pub use orchestrator::WaveOrchestrator;
pub use state::{HaltReason, WaveAnomaly, WavePhase, WaveProgress, WaveProgressUpdate};
pub use tracking::WaveEnemy;

/// Resource to enable/disable the wave task. Turning it off cancels a
/// running task for good.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WaveModeEnabled(pub bool);

impl Default for WaveModeEnabled {
    fn default() -> Self {
        Self(true)
    }
}

pub struct WaveSystemPlugin;

impl Plugin for WaveSystemPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveOrchestrator>();
        app.init_resource::<WaveProgress>();
        app.init_resource::<WaveModeEnabled>();
        app.init_resource::<lifecycle::LifecycleRegistry>();

        app.add_message::<WaveProgressUpdate>();
        app.add_message::<WaveAnomaly>();

        app.register_type::<WavePhase>();
        app.register_type::<WaveEnemy>();

        app.add_systems(
            Update,
            discover_spawn_points_system
                .run_if(resource_exists::<WaveSchedule>.and(not(resource_exists::<SpawnPointPool>)))
                .in_set(WaveSystemSet::Setup),
        );

        // Deaths are handled after damage marks them and before corpses are
        // despawned, vanished enemies once the despawns are applied
        app.add_systems(
            Update,
            (
                lifecycle::handle_enemy_deaths
                    .after(apply_damage_system)
                    .before(despawn_corpses_system),
                lifecycle::reap_vanished_enemies.after(despawn_corpses_system),
            )
                .in_set(WaveSystemSet::DeathManagement),
        );

        app.add_systems(
            Update,
            (
                systems::halt_waves_on_player_death,
                systems::cancel_wave_task_when_disabled,
                systems::start_wave_task.run_if(wave_task_ready),
                systems::advance_wave_task.run_if(wave_task_ready),
            )
                .chain()
                .in_set(WaveSystemSet::Orchestration),
        );
    }
}

/// Run condition: the level is installed and wave mode is enabled
fn wave_task_ready(
    wave_mode: Res<WaveModeEnabled>,
    schedule: Option<Res<WaveSchedule>>,
    pool: Option<Res<SpawnPointPool>>,
) -> bool {
    wave_mode.0 && schedule.is_some() && pool.is_some()
}
