pub mod create;

use bevy::prelude::*;

#[derive(Component, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Player;

/// Locomotion state owned by the external character controller.
/// Only its enable flag and velocity are touched here.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MotionController {
    pub enabled: bool,
    pub velocity: Vec3,
}

impl Default for MotionController {
    fn default() -> Self {
        Self {
            enabled: true,
            velocity: Vec3::ZERO,
        }
    }
}

/// Moves the player to `destination`, suspending its controller for the move.
pub fn teleport(
    transform: &mut Transform,
    motion: Option<&mut MotionController>,
    destination: &Transform,
) {
    match motion {
        Some(motion) => {
            let was_enabled = motion.enabled;
            motion.enabled = false;
            *transform = *destination;
            motion.velocity = Vec3::ZERO;
            motion.enabled = was_enabled;
        }
        None => *transform = *destination,
    }
}
