pub mod enemy;
pub mod health;
pub mod player;

use bevy::prelude::*;

use crate::{
    character::{
        enemy::{Enemy, EnemyKind},
        health::{
            apply_damage_system, despawn_corpses_system, CorpseLinger, DamageRequest, EntityDied,
            PlayerDied,
        },
        player::Player,
    },
    system_set::WaveSystemSet,
};

pub struct BaseCharacterGamePlugin;

impl Plugin for BaseCharacterGamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CorpseLinger>();

        app.add_message::<DamageRequest>();
        app.add_message::<EntityDied>();
        app.add_message::<PlayerDied>();

        app.register_type::<Player>()
            .register_type::<Enemy>()
            .register_type::<EnemyKind>();

        app.add_systems(
            Update,
            (apply_damage_system, despawn_corpses_system)
                .chain()
                .in_set(WaveSystemSet::DeathManagement),
        );
    }
}
