use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use utils::frame::FrameCount;

use crate::character::player::Player;

#[derive(Component, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Applies `amount` of damage. Returns true only for the hit that takes
    /// the entity from alive to dead; later hits on a dead entity are ignored.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() || amount <= 0.0 {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        !self.is_alive()
    }
}

/// Marker left on an entity after its death. The entity stays in the world,
/// hidden, until the corpse is cleaned up.
#[derive(Component, Clone, Copy, Debug)]
pub struct Dead {
    pub at_frame: u32,
}

/// Frames a dead non-player entity lingers before it is despawned.
#[derive(Resource, Clone, Copy, Debug)]
pub struct CorpseLinger {
    pub frames: u32,
}

impl Default for CorpseLinger {
    fn default() -> Self {
        Self { frames: 120 }
    }
}

/// Request from a hit detection source to hurt an entity.
#[derive(Message, Clone, Copy, Debug)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Single death notification for any entity with `Health`.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerDied {
    pub entity: Entity,
}

pub fn apply_damage_system(
    mut commands: Commands,
    frame: Res<FrameCount>,
    mut requests: MessageReader<DamageRequest>,
    mut query: Query<(&mut Health, Has<Player>), Without<Dead>>,
    mut died: MessageWriter<EntityDied>,
    mut player_died: MessageWriter<PlayerDied>,
) {
    for request in requests.read() {
        let Ok((mut health, is_player)) = query.get_mut(request.target) else {
            trace!("{} damage ignored target={:?} (missing or dead)", *frame, request.target);
            continue;
        };

        if !health.take_damage(request.amount) {
            continue;
        }

        info!("{} entity_died entity={:?} player={}", *frame, request.target, is_player);

        commands
            .entity(request.target)
            .insert((Dead { at_frame: frame.frame }, Visibility::Hidden));

        died.write(EntityDied { entity: request.target });
        if is_player {
            player_died.write(PlayerDied { entity: request.target });
        }
    }
}

pub fn despawn_corpses_system(
    mut commands: Commands,
    frame: Res<FrameCount>,
    linger: Res<CorpseLinger>,
    query: Query<(Entity, &Dead), Without<Player>>,
) {
    for (entity, dead) in query.iter() {
        if frame.frame >= dead.at_frame.saturating_add(linger.frames) {
            debug!("{} despawn corpse entity={:?}", *frame, entity);
            commands.entity(entity).despawn();
        }
    }
}
