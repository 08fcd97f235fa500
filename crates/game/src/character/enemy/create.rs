use bevy::prelude::*;

use crate::{
    character::health::Health,
    waves::tracking::WaveEnemy,
};

use super::{Enemy, EnemyKind, EnemyStats};

pub fn spawn_enemy(
    commands: &mut Commands,
    kind: &EnemyKind,
    stats: &EnemyStats,
    pose: Transform,
    wave_index: usize,
) -> Entity {
    commands
        .spawn((
            Name::new(format!("{} (wave {})", kind, wave_index + 1)),
            Enemy { kind: kind.clone() },
            Health::new(stats.max_health),
            stats.clone(),
            WaveEnemy,
            pose,
            Visibility::Visible,
        ))
        .id()
}
