//! The wave task.
//!
//! ```text
//! Idle -> InterWaveDelay -> Spawning -> AwaitingClear -> ShopEnter -> AwaitingShopExit
//!              ^                                                          |
//!              +--------------------------- next wave ---------------------+--> Completed
//! ```
//!
//! [`WaveOrchestrator`] is a resumable state machine. It is resumed once per
//! tick and talks to the world only through [`WaveHost`], so the ECS side
//! lives in `systems` and the tests can drive it with a fake host.

use std::collections::VecDeque;

use bevy::prelude::*;
use utils::frame::FrameCount;

use crate::{character::enemy::EnemyKind, shop::ShopEntry};

use super::{
    config::{WaveConfigError, WaveSchedule, WaveTimings},
    state::{HaltReason, WaveAnomaly, WavePhase, WaveProgress, WaveProgressUpdate},
    task::{Poll, Wait},
};

pub trait WaveHost {
    fn frame(&self) -> FrameCount;
    fn spawn_point_count(&self) -> usize;
    /// Enemy type to spawn for a wave entry, `None` when nothing fits.
    fn resolve(&self, requested: Option<&EnemyKind>) -> Option<EnemyKind>;
    /// Spawns one enemy and binds its death to the wave. Returns false when
    /// nothing could be spawned.
    fn spawn_enemy(&mut self, wave_index: usize, kind: &EnemyKind) -> bool;
    fn progress(&mut self) -> &mut WaveProgress;
    fn enter_shop(&mut self) -> ShopEntry;
    /// `None` when there is no shop gate.
    fn shop_occupied(&self) -> Option<bool>;
    fn publish(&mut self, update: WaveProgressUpdate);
    fn report(&mut self, anomaly: WaveAnomaly);
}

#[derive(Resource, Debug, Default)]
pub struct WaveOrchestrator {
    phase: WavePhase,
    wait: Option<Wait>,
    plan: VecDeque<EnemyKind>,
    halted: Option<HaltReason>,
    shop_entered_at: u32,
}

impl WaveOrchestrator {
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn halted(&self) -> Option<&HaltReason> {
        self.halted.as_ref()
    }

    pub fn can_start(&self) -> bool {
        self.halted.is_none() && self.phase == WavePhase::Idle
    }

    pub fn is_running(&self) -> bool {
        self.halted.is_none() && !matches!(self.phase, WavePhase::Idle | WavePhase::Completed)
    }

    /// Enemies of the current wave still waiting to be spawned.
    pub fn pending_spawns(&self) -> usize {
        self.plan.len()
    }

    pub fn validate(schedule: &WaveSchedule, host: &impl WaveHost) -> Result<(), WaveConfigError> {
        if host.spawn_point_count() == 0 {
            return Err(WaveConfigError::NoSpawnPoints);
        }
        if schedule.is_empty() {
            return Err(WaveConfigError::NoWaves);
        }
        let any_resolvable = host.resolve(None).is_some()
            || schedule
                .waves
                .iter()
                .flat_map(|wave| wave.entries.iter())
                .any(|entry| host.resolve(entry.enemy.as_ref()).is_some());
        if !any_resolvable {
            return Err(WaveConfigError::NoEnemyTypes);
        }
        Ok(())
    }

    /// Validates the level and schedules the delay before the first wave.
    /// A configuration error halts the task for good.
    pub fn start(
        &mut self,
        schedule: &WaveSchedule,
        timings: &WaveTimings,
        host: &mut impl WaveHost,
    ) -> Result<(), WaveConfigError> {
        if !self.can_start() {
            return Ok(());
        }
        let frame = host.frame();

        if let Err(err) = Self::validate(schedule, &*host) {
            error!("{} wave_task halted, configuration error: {}", frame, err);
            let reason = HaltReason::Misconfigured(err.clone());
            self.halt(reason.clone());
            host.publish(WaveProgressUpdate::Halted { reason });
            return Err(err);
        }

        info!("{} wave_task started waves={}", frame, schedule.len());
        host.progress().reset();
        self.enter_delay(frame, timings, host);
        Ok(())
    }

    /// Runs the task until it has to wait again.
    pub fn resume(&mut self, schedule: &WaveSchedule, timings: &WaveTimings, host: &mut impl WaveHost) {
        loop {
            if !self.is_running() {
                return;
            }
            let frame = host.frame();

            let poll = match self.wait.as_mut() {
                Some(wait) => wait.poll(frame.frame, || host.shop_occupied() != Some(true)),
                None => Poll::Ready,
            };
            match poll {
                Poll::Pending => return,
                Poll::Ready => self.wait = None,
                Poll::TimedOut => {
                    self.wait = None;
                    let wave = host.progress().wave_index;
                    let waited_frames = frame.frame.saturating_sub(self.shop_entered_at);
                    error!(
                        "{} wave_task player still in shop after {} frames, moving on from wave {}",
                        frame,
                        waited_frames,
                        wave + 1
                    );
                    host.report(WaveAnomaly::ShopExitTimeout { wave, waited_frames });
                    self.advance_wave(frame, schedule, timings, host);
                    continue;
                }
            }

            match self.phase {
                WavePhase::InterWaveDelay => self.begin_wave(frame, schedule, host),
                WavePhase::Spawning => self.spawn_next(frame, schedule, host),
                WavePhase::AwaitingClear => self.await_clear(frame, host),
                WavePhase::ShopEnter => self.enter_shop(frame, schedule, timings, host),
                WavePhase::AwaitingShopExit => {
                    if host.shop_occupied().is_none() {
                        let wave = host.progress().wave_index;
                        error!("{} wave_task shop gate vanished while waiting for the player", frame);
                        host.report(WaveAnomaly::MissingShopGate { wave });
                    } else {
                        info!("{} wave_task player left the shop", frame);
                    }
                    self.advance_wave(frame, schedule, timings, host);
                }
                WavePhase::Idle | WavePhase::Completed => return,
            }
        }
    }

    /// Stops the task; it is never resumed again. Returns false when it was
    /// already halted.
    pub fn cancel(&mut self, reason: HaltReason) -> bool {
        if self.halted.is_some() {
            return false;
        }
        self.halt(reason);
        true
    }

    fn halt(&mut self, reason: HaltReason) {
        self.wait = None;
        self.plan.clear();
        self.halted = Some(reason);
    }

    fn enter_delay(&mut self, frame: FrameCount, timings: &WaveTimings, host: &mut impl WaveHost) {
        let number = host.progress().wave_number();
        self.phase = WavePhase::InterWaveDelay;
        self.wait = Some(Wait::frames(frame.frame, timings.wave_delay_frames));

        info!(
            "{} wave_task phase=InterWaveDelay wave={} delay={}",
            frame, number, timings.wave_delay_frames
        );
        host.publish(WaveProgressUpdate::Preparing { number });
    }

    fn begin_wave(&mut self, frame: FrameCount, schedule: &WaveSchedule, host: &mut impl WaveHost) {
        let index = host.progress().wave_index;
        let Some(wave) = schedule.get(index) else {
            self.complete(frame, host);
            return;
        };

        self.plan.clear();
        let mut unresolved = 0;
        for entry in &wave.entries {
            match host.resolve(entry.enemy.as_ref()) {
                Some(kind) => self
                    .plan
                    .extend(std::iter::repeat(kind).take(entry.count as usize)),
                None => {
                    warn!(
                        "{} wave_task wave={} entry {:?} has no enemy type, skipping {}",
                        frame,
                        index + 1,
                        entry.enemy,
                        entry.count
                    );
                    unresolved += entry.count;
                    host.report(WaveAnomaly::UnresolvableEntry {
                        wave: index,
                        requested: entry.enemy.clone(),
                        count: entry.count,
                    });
                }
            }
        }

        let progress = host.progress();
        progress.begin_wave(index, wave.total_count());
        progress.forget(unresolved);
        let remaining = progress.enemies_alive;

        self.phase = WavePhase::Spawning;
        info!(
            "{} wave_task phase=Spawning wave={}/{} enemies={}",
            frame,
            index + 1,
            schedule.len(),
            remaining
        );
        host.publish(WaveProgressUpdate::Wave {
            number: index + 1,
            total: schedule.len(),
            remaining,
        });
    }

    fn spawn_next(&mut self, frame: FrameCount, schedule: &WaveSchedule, host: &mut impl WaveHost) {
        let index = host.progress().wave_index;

        if let Some(kind) = self.plan.pop_front() {
            if !host.spawn_enemy(index, &kind) {
                warn!("{} wave_task failed to spawn {} for wave {}", frame, kind, index + 1);
                host.report(WaveAnomaly::SpawnFailed { wave: index, kind });
                let progress = host.progress();
                progress.forget(1);
                let remaining = progress.enemies_alive;
                host.publish(WaveProgressUpdate::EnemiesRemaining { remaining });
            }
        }

        if self.plan.is_empty() {
            info!("{} wave_task phase=AwaitingClear wave={}", frame, index + 1);
            self.phase = WavePhase::AwaitingClear;
        } else {
            let interval = schedule.get(index).map_or(0, |wave| wave.spawn_interval_frames);
            self.wait = Some(Wait::frames(frame.frame, interval));
        }
    }

    fn await_clear(&mut self, frame: FrameCount, host: &mut impl WaveHost) {
        if host.progress().enemies_alive > 0 {
            self.wait = Some(Wait::next_tick(frame.frame));
            return;
        }
        info!("{} wave_task phase=ShopEnter wave={} cleared", frame, host.progress().wave_number());
        self.phase = WavePhase::ShopEnter;
    }

    fn enter_shop(
        &mut self,
        frame: FrameCount,
        schedule: &WaveSchedule,
        timings: &WaveTimings,
        host: &mut impl WaveHost,
    ) {
        let wave = host.progress().wave_index;
        match host.enter_shop() {
            ShopEntry::Entered | ShopEntry::AlreadyInside => {
                info!("{} wave_task phase=AwaitingShopExit wave={}", frame, wave + 1);
                self.phase = WavePhase::AwaitingShopExit;
                self.shop_entered_at = frame.frame;
                self.wait = Some(Wait::until(
                    frame.frame,
                    timings.shop_poll_interval_frames,
                    timings.shop_exit_timeout_frames,
                ));
            }
            ShopEntry::NoGate => {
                error!("{} wave_task no shop gate, skipping the shop after wave {}", frame, wave + 1);
                host.report(WaveAnomaly::MissingShopGate { wave });
                self.advance_wave(frame, schedule, timings, host);
            }
            ShopEntry::NoPlayer => {
                error!("{} wave_task no player to send to the shop after wave {}", frame, wave + 1);
                host.report(WaveAnomaly::MissingPlayer { wave });
                self.advance_wave(frame, schedule, timings, host);
            }
        }
    }

    fn advance_wave(
        &mut self,
        frame: FrameCount,
        schedule: &WaveSchedule,
        timings: &WaveTimings,
        host: &mut impl WaveHost,
    ) {
        let next = host.progress().wave_index + 1;
        if next >= schedule.len() {
            self.complete(frame, host);
            return;
        }
        host.progress().wave_index = next;
        self.enter_delay(frame, timings, host);
    }

    fn complete(&mut self, frame: FrameCount, host: &mut impl WaveHost) {
        self.phase = WavePhase::Completed;
        self.wait = None;
        self.plan.clear();
        info!(
            "{} wave_task phase=Completed killed={}",
            frame,
            host.progress().total_killed
        );
        host.publish(WaveProgressUpdate::Completed);
    }
}
