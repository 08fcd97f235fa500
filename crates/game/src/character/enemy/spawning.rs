use bevy::prelude::*;
use utils::rng::GameRng;

/// Parent of every spawn location of a level.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SpawnPointContainer;

#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnPoint {
    pub enabled: bool,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPose {
    pub name: String,
    pub transform: Transform,
}

/// Spawn locations captured once when the level is installed.
///
/// Points disabled at discovery time are never used, and points toggled
/// later are not picked up.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnPointPool {
    points: Vec<SpawnPose>,
}

impl SpawnPointPool {
    pub fn discover<'a>(
        container: &Transform,
        children: impl IntoIterator<Item = (&'a SpawnPoint, Option<&'a Name>, &'a Transform)>,
    ) -> Self {
        let points = children
            .into_iter()
            .enumerate()
            .filter(|(_, (point, _, _))| point.enabled)
            .map(|(index, (_, name, local))| SpawnPose {
                name: name
                    .map(|n| n.as_str().to_string())
                    .unwrap_or_else(|| format!("spawn_point_{}", index)),
                transform: container.mul_transform(*local),
            })
            .collect();

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn pick(&self, rng: &mut GameRng) -> Option<&SpawnPose> {
        if self.points.is_empty() {
            return None;
        }
        self.points.get(rng.index(self.points.len()))
    }
}

pub fn discover_spawn_points_system(
    mut commands: Commands,
    containers: Query<(&Transform, Option<&Children>), With<SpawnPointContainer>>,
    points: Query<(&SpawnPoint, Option<&Name>, &Transform)>,
) {
    let Some((container, children)) = containers.iter().next() else {
        warn!("no spawn point container in the level, wave spawning has nowhere to go");
        commands.insert_resource(SpawnPointPool::default());
        return;
    };

    let children = children
        .into_iter()
        .flat_map(|children| children.iter())
        .filter_map(|child| points.get(child).ok());

    let pool = SpawnPointPool::discover(container, children);

    if pool.is_empty() {
        warn!("spawn point container has no enabled spawn point");
    } else {
        info!("discovered {} spawn points", pool.len());
    }

    commands.insert_resource(pool);
}
