//! Wave and level data loaded from RON files.
//!
//! Timings are expressed in frames at 60 ticks per second.

use std::collections::BTreeMap;

use bevy::{prelude::*, reflect::TypePath};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    character::{
        enemy::{
            spawning::{SpawnPoint, SpawnPointContainer},
            EnemyCatalog, EnemyKind, EnemyStats,
        },
        health::CorpseLinger,
        player::create::spawn_player,
    },
    economy::CurrencyLedger,
    shop::{ShopCatalog, ShopGate, ShopItem, ShopPresentation},
};

/// Fatal problems that keep the waves from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaveConfigError {
    #[error("no enabled spawn point")]
    NoSpawnPoints,
    #[error("no wave defined")]
    NoWaves,
    #[error("no wave entry resolves to a known enemy type and there is no default")]
    NoEnemyTypes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    pub position: [f32; 3],
    /// Rotation around the vertical axis
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl PoseConfig {
    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.position))
            .with_rotation(Quat::from_rotation_y(self.yaw_degrees.to_radians()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPointConfig {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SpawnPointConfig {
    pub fn pose(&self) -> PoseConfig {
        PoseConfig {
            position: self.position,
            yaw_degrees: self.yaw_degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub spawn: PoseConfig,
    #[serde(default = "default_player_health")]
    pub max_health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Where the player lands when entering the shop
    pub spawn: PoseConfig,
    /// Where the exit trigger sends the player back to. When absent the
    /// player returns to where they entered from.
    #[serde(default)]
    pub exit: Option<PoseConfig>,
    #[serde(default)]
    pub items: Vec<ShopItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// Enemy type of the entry, the default type when absent or unknown
    #[serde(default)]
    pub enemy: Option<EnemyKind>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDefinition {
    #[serde(default)]
    pub name: Option<String>,
    /// Delay between two spawns of the wave
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval_frames: u32,
    pub entries: Vec<SpawnEntry>,
}

impl WaveDefinition {
    pub fn total_count(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

/// Ordered waves of the level.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveSchedule {
    pub waves: Vec<WaveDefinition>,
}

impl WaveSchedule {
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WaveDefinition> {
        self.waves.get(index)
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveTimings {
    pub wave_delay_frames: u32,
    pub shop_poll_interval_frames: u32,
    pub shop_exit_timeout_frames: u32,
}

impl Default for WaveTimings {
    fn default() -> Self {
        Self {
            wave_delay_frames: default_wave_delay(),
            shop_poll_interval_frames: default_shop_poll_interval(),
            shop_exit_timeout_frames: default_shop_exit_timeout(),
        }
    }
}

/// Main level configuration loaded from a `.waves.ron` file
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Delay before every wave, the first one included
    #[serde(default = "default_wave_delay")]
    pub wave_delay_frames: u32,
    #[serde(default = "default_shop_poll_interval")]
    pub shop_poll_interval_frames: u32,
    /// Longest time the player may stay in the shop
    #[serde(default = "default_shop_exit_timeout")]
    pub shop_exit_timeout_frames: u32,
    #[serde(default = "default_corpse_linger")]
    pub corpse_linger_frames: u32,
    #[serde(default)]
    pub starting_currency: u32,

    #[serde(default)]
    pub default_enemy: Option<EnemyKind>,
    pub enemies: BTreeMap<EnemyKind, EnemyStats>,

    pub spawn_points: Vec<SpawnPointConfig>,
    pub player: PlayerConfig,
    #[serde(default)]
    pub shop: Option<ShopConfig>,

    pub waves: Vec<WaveDefinition>,
}

fn default_true() -> bool {
    true
}

fn default_player_health() -> f32 {
    100.0
}

fn default_spawn_interval() -> u32 {
    60
}

fn default_wave_delay() -> u32 {
    300
}

fn default_shop_poll_interval() -> u32 {
    30
}

fn default_shop_exit_timeout() -> u32 {
    // 600 polls of half a second
    36_000
}

fn default_corpse_linger() -> u32 {
    120
}

impl WaveConfig {
    pub fn timings(&self) -> WaveTimings {
        WaveTimings {
            wave_delay_frames: self.wave_delay_frames,
            shop_poll_interval_frames: self.shop_poll_interval_frames,
            shop_exit_timeout_frames: self.shop_exit_timeout_frames,
        }
    }

    pub fn catalog(&self) -> EnemyCatalog {
        EnemyCatalog::new(self.default_enemy.clone(), self.enemies.clone())
    }

    /// Inserts the level resources and spawns the player, the spawn points
    /// and the shop described by this config.
    pub fn install(&self, commands: &mut Commands) {
        commands.insert_resource(WaveSchedule {
            waves: self.waves.clone(),
        });
        commands.insert_resource(self.timings());
        let catalog = self.catalog();
        for kind in catalog.unspawnable() {
            warn!("enemy type {} has no health, waves will not spawn it", kind);
        }
        commands.insert_resource(catalog);
        commands.insert_resource(CurrencyLedger::with_balance(self.starting_currency));
        commands.insert_resource(CorpseLinger {
            frames: self.corpse_linger_frames,
        });

        commands
            .spawn((
                Name::new("SpawnPoints"),
                SpawnPointContainer,
                Transform::default(),
                Visibility::default(),
            ))
            .with_children(|parent| {
                for point in &self.spawn_points {
                    parent.spawn((
                        Name::new(point.name.clone()),
                        SpawnPoint {
                            enabled: point.enabled,
                        },
                        point.pose().to_transform(),
                    ));
                }
            });

        spawn_player(
            commands,
            self.player.spawn.to_transform(),
            self.player.max_health,
        );

        match &self.shop {
            Some(shop) => {
                commands.insert_resource(ShopGate::new(
                    shop.spawn.to_transform(),
                    shop.exit.as_ref().map(PoseConfig::to_transform),
                ));
                commands.insert_resource(ShopCatalog {
                    items: shop.items.clone(),
                });
                commands.spawn((
                    Name::new("Shop"),
                    ShopPresentation::default(),
                    shop.spawn.to_transform(),
                    Visibility::Hidden,
                ));
            }
            None => warn!("level has no shop, waves will follow each other directly"),
        }

        info!(
            "wave config installed waves={} enemy_types={} spawn_points={}",
            self.waves.len(),
            self.enemies.len(),
            self.spawn_points.len()
        );
    }
}
