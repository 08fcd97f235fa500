//! Binds each spawned enemy to a single-fire death notification.
//!
//! A subscription is removed from the [`LifecycleRegistry`] the first time it
//! is delivered, so the live count is decremented and the reward paid exactly
//! once per enemy however many death signals arrive.

use bevy::{platform::collections::HashMap, prelude::*};
use utils::frame::FrameCount;

use crate::{
    character::{enemy::EnemyKind, health::EntityDied},
    economy::{dispatch_reward, CurrencyLedger, RewardOutcome},
};

use super::{
    state::{WaveAnomaly, WaveProgress, WaveProgressUpdate},
    tracking::WaveEnemy,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeathSubscription {
    pub wave_index: usize,
    pub kind: EnemyKind,
    pub reward: Option<i32>,
}

#[derive(Resource, Debug, Default)]
pub struct LifecycleRegistry {
    subscriptions: HashMap<Entity, DeathSubscription>,
}

impl LifecycleRegistry {
    pub fn register(&mut self, entity: Entity, subscription: DeathSubscription) {
        self.subscriptions.insert(entity, subscription);
    }

    /// Removes and returns the subscription of `entity`.
    pub fn take(&mut self, entity: Entity) -> Option<DeathSubscription> {
        self.subscriptions.remove(&entity)
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.subscriptions.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

pub fn handle_enemy_deaths(
    frame: Res<FrameCount>,
    mut deaths: MessageReader<EntityDied>,
    mut registry: ResMut<LifecycleRegistry>,
    mut progress: ResMut<WaveProgress>,
    mut ledger: ResMut<CurrencyLedger>,
    mut updates: MessageWriter<WaveProgressUpdate>,
    mut anomalies: MessageWriter<WaveAnomaly>,
) {
    for death in deaths.read() {
        let Some(subscription) = registry.take(death.entity) else {
            trace!("{} death of {:?} has no subscription", *frame, death.entity);
            continue;
        };

        if progress.record_death(subscription.wave_index) {
            updates.write(WaveProgressUpdate::EnemiesRemaining {
                remaining: progress.enemies_alive,
            });
        }

        match dispatch_reward(&mut ledger, subscription.reward) {
            RewardOutcome::Credited(amount) => debug!(
                "{} enemy_death entity={:?} kind={} reward={} remaining={}",
                *frame, death.entity, subscription.kind, amount, progress.enemies_alive
            ),
            RewardOutcome::Skipped => debug!(
                "{} enemy_death entity={:?} kind={} no reward remaining={}",
                *frame, death.entity, subscription.kind, progress.enemies_alive
            ),
            RewardOutcome::MissingRewardData => {
                warn!(
                    "{} enemy_death entity={:?} kind={} has no reward data",
                    *frame, death.entity, subscription.kind
                );
                anomalies.write(WaveAnomaly::MissingReward {
                    kind: subscription.kind,
                });
            }
        }
    }
}

pub fn reap_vanished_enemies(
    frame: Res<FrameCount>,
    mut removed: RemovedComponents<WaveEnemy>,
    mut registry: ResMut<LifecycleRegistry>,
    mut progress: ResMut<WaveProgress>,
    mut updates: MessageWriter<WaveProgressUpdate>,
    mut anomalies: MessageWriter<WaveAnomaly>,
) {
    for entity in removed.read() {
        let Some(subscription) = registry.take(entity) else {
            continue;
        };

        warn!(
            "{} wave enemy {:?} ({}) left the world without dying",
            *frame, entity, subscription.kind
        );
        anomalies.write(WaveAnomaly::EnemyVanished {
            entity,
            wave: subscription.wave_index,
        });
        if progress.release(subscription.wave_index) {
            updates.write(WaveProgressUpdate::EnemiesRemaining {
                remaining: progress.enemies_alive,
            });
        }
    }
}
