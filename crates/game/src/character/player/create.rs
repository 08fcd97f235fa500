use bevy::prelude::*;

use crate::character::{
    health::Health,
    player::{MotionController, Player},
};

pub fn spawn_player(commands: &mut Commands, pose: Transform, max_health: f32) -> Entity {
    let entity = commands
        .spawn((
            Name::new("Player"),
            Player,
            MotionController::default(),
            Health::new(max_health),
            pose,
            Visibility::Visible,
        ))
        .id();

    info!("player spawned entity={:?} at {}", entity, pose.translation);

    entity
}
