//! ECS side of the wave task.

use bevy::{ecs::system::SystemParam, prelude::*};
use utils::{frame::FrameCount, rng::GameRng};

use crate::{
    character::{
        enemy::{
            create::spawn_enemy,
            spawning::SpawnPointPool,
            EnemyCatalog, EnemyKind,
        },
        health::PlayerDied,
    },
    shop::{ShopAccess, ShopEntry},
};

use super::{
    config::{WaveSchedule, WaveTimings},
    lifecycle::{DeathSubscription, LifecycleRegistry},
    orchestrator::{WaveHost, WaveOrchestrator},
    state::{HaltReason, WaveAnomaly, WavePhase, WaveProgress, WaveProgressUpdate},
    WaveModeEnabled,
};

/// Everything the wave task touches in the world, bundled for [`WaveHost`].
#[derive(SystemParam)]
pub struct WaveContext<'w, 's> {
    frame: Res<'w, FrameCount>,
    commands: Commands<'w, 's>,
    rng: ResMut<'w, GameRng>,
    pool: Option<Res<'w, SpawnPointPool>>,
    catalog: Option<Res<'w, EnemyCatalog>>,
    registry: ResMut<'w, LifecycleRegistry>,
    progress: ResMut<'w, WaveProgress>,
    shop: ShopAccess<'w, 's>,
    updates: MessageWriter<'w, WaveProgressUpdate>,
    anomalies: MessageWriter<'w, WaveAnomaly>,
}

impl WaveHost for WaveContext<'_, '_> {
    fn frame(&self) -> FrameCount {
        *self.frame
    }

    fn spawn_point_count(&self) -> usize {
        self.pool.as_ref().map_or(0, |pool| pool.len())
    }

    fn resolve(&self, requested: Option<&EnemyKind>) -> Option<EnemyKind> {
        self.catalog.as_ref().and_then(|catalog| catalog.resolve(requested))
    }

    fn spawn_enemy(&mut self, wave_index: usize, kind: &EnemyKind) -> bool {
        let Some(pose) = self
            .pool
            .as_ref()
            .and_then(|pool| pool.pick(&mut self.rng))
            .cloned()
        else {
            return false;
        };
        let Some(stats) = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.get(kind))
            .cloned()
        else {
            return false;
        };

        let entity = spawn_enemy(&mut self.commands, kind, &stats, pose.transform, wave_index);
        self.registry.register(
            entity,
            DeathSubscription {
                wave_index,
                kind: kind.clone(),
                reward: stats.reward,
            },
        );

        trace!(
            "{} wave_spawn entity={:?} kind={} at={}",
            *self.frame,
            entity,
            kind,
            pose.name
        );
        true
    }

    fn progress(&mut self) -> &mut WaveProgress {
        &mut self.progress
    }

    fn enter_shop(&mut self) -> ShopEntry {
        self.shop.enter()
    }

    fn shop_occupied(&self) -> Option<bool> {
        self.shop.is_occupied()
    }

    fn publish(&mut self, update: WaveProgressUpdate) {
        self.updates.write(update);
    }

    fn report(&mut self, anomaly: WaveAnomaly) {
        self.anomalies.write(anomaly);
    }
}

pub fn start_wave_task(
    mut orchestrator: ResMut<WaveOrchestrator>,
    schedule: Res<WaveSchedule>,
    timings: Res<WaveTimings>,
    mut context: WaveContext,
) {
    if !orchestrator.can_start() {
        return;
    }
    if let Err(err) = orchestrator.start(&schedule, &timings, &mut context) {
        debug!("wave task not started: {}", err);
    }
}

pub fn advance_wave_task(
    mut orchestrator: ResMut<WaveOrchestrator>,
    schedule: Res<WaveSchedule>,
    timings: Res<WaveTimings>,
    mut context: WaveContext,
) {
    orchestrator.resume(&schedule, &timings, &mut context);
}

pub fn cancel_wave_task_when_disabled(
    frame: Res<FrameCount>,
    mode: Res<WaveModeEnabled>,
    mut orchestrator: ResMut<WaveOrchestrator>,
    mut updates: MessageWriter<WaveProgressUpdate>,
) {
    if mode.0 {
        return;
    }
    if orchestrator.cancel(HaltReason::Disabled) {
        warn!("{} wave_task cancelled, wave mode disabled", *frame);
        updates.write(WaveProgressUpdate::Halted {
            reason: HaltReason::Disabled,
        });
    }
}

pub fn halt_waves_on_player_death(
    frame: Res<FrameCount>,
    mut deaths: MessageReader<PlayerDied>,
    mut orchestrator: ResMut<WaveOrchestrator>,
    mut updates: MessageWriter<WaveProgressUpdate>,
) {
    if deaths.read().count() == 0 || orchestrator.phase() == WavePhase::Completed {
        return;
    }
    if orchestrator.cancel(HaltReason::GameOver) {
        info!("{} wave_task stopped, game over", *frame);
        updates.write(WaveProgressUpdate::GameOver);
    }
}
