//! Wave enemy tracking components.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker component for enemies spawned by the wave task.
///
/// Its removal is how an enemy that leaves the world without dying is noticed.
/// The wave an enemy belongs to is kept by the
/// [`LifecycleRegistry`](super::lifecycle::LifecycleRegistry).
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Default, Reflect)]
#[reflect(Component)]
pub struct WaveEnemy;
