pub mod create;
pub mod spawning;

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of an enemy type in the enemy table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Reflect)]
#[serde(transparent)]
pub struct EnemyKind(pub String);

impl EnemyKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Enemy {
    pub kind: EnemyKind,
}

/// Per type data. Combat values are carried for the external AI; the wave
/// logic only reads `max_health` and `reward`.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_health: f32,
    #[serde(default)]
    pub move_speed: f32,
    #[serde(default)]
    pub attack_damage: f32,
    #[serde(default)]
    pub attack_range: f32,
    #[serde(default)]
    pub attack_rate: f32,
    /// Currency paid when the enemy dies. `None` means the table has no
    /// reward data for this type.
    #[serde(default)]
    pub reward: Option<i32>,
}

impl EnemyStats {
    /// An enemy without positive health could never die.
    pub fn is_spawnable(&self) -> bool {
        self.max_health.is_finite() && self.max_health > 0.0
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct EnemyCatalog {
    pub default_kind: Option<EnemyKind>,
    pub stats: BTreeMap<EnemyKind, EnemyStats>,
}

impl EnemyCatalog {
    pub fn new(default_kind: Option<EnemyKind>, stats: BTreeMap<EnemyKind, EnemyStats>) -> Self {
        Self { default_kind, stats }
    }

    pub fn get(&self, kind: &EnemyKind) -> Option<&EnemyStats> {
        self.stats.get(kind)
    }

    fn is_spawnable(&self, kind: &EnemyKind) -> bool {
        self.stats.get(kind).is_some_and(EnemyStats::is_spawnable)
    }

    /// Type to spawn for a wave entry: the requested type when the table
    /// knows it with usable stats, otherwise the default type, otherwise
    /// nothing.
    pub fn resolve(&self, requested: Option<&EnemyKind>) -> Option<EnemyKind> {
        match requested {
            Some(kind) if self.is_spawnable(kind) => Some(kind.clone()),
            _ => self
                .default_kind
                .as_ref()
                .filter(|kind| self.is_spawnable(kind))
                .cloned(),
        }
    }

    /// Types in the table that can never be spawned.
    pub fn unspawnable(&self) -> impl Iterator<Item = &EnemyKind> {
        self.stats
            .iter()
            .filter(|(_, stats)| !stats.is_spawnable())
            .map(|(kind, _)| kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(reward: Option<i32>) -> EnemyStats {
        EnemyStats {
            max_health: 10.0,
            move_speed: 1.0,
            attack_damage: 1.0,
            attack_range: 1.0,
            attack_rate: 1.0,
            reward,
        }
    }

    fn catalog(default_kind: Option<&str>) -> EnemyCatalog {
        let mut table = BTreeMap::new();
        table.insert(EnemyKind::new("walker"), stats(Some(10)));
        table.insert(EnemyKind::new("runner"), stats(Some(15)));
        EnemyCatalog::new(default_kind.map(EnemyKind::new), table)
    }

    #[test]
    fn known_kind_resolves_to_itself() {
        let catalog = catalog(Some("walker"));
        assert_eq!(
            catalog.resolve(Some(&EnemyKind::new("runner"))),
            Some(EnemyKind::new("runner"))
        );
    }

    #[test]
    fn missing_or_unknown_kind_falls_back_to_default() {
        let catalog = catalog(Some("walker"));
        assert_eq!(catalog.resolve(None), Some(EnemyKind::new("walker")));
        assert_eq!(
            catalog.resolve(Some(&EnemyKind::new("ghost"))),
            Some(EnemyKind::new("walker"))
        );
    }

    #[test]
    fn unresolvable_without_default() {
        let catalog = catalog(None);
        assert_eq!(catalog.resolve(None), None);
        assert_eq!(catalog.resolve(Some(&EnemyKind::new("ghost"))), None);
    }

    #[test]
    fn type_without_health_is_not_spawned() {
        let mut catalog = catalog(Some("walker"));
        if let Some(runner) = catalog.stats.get_mut(&EnemyKind::new("runner")) {
            runner.max_health = 0.0;
        }
        assert_eq!(
            catalog.resolve(Some(&EnemyKind::new("runner"))),
            Some(EnemyKind::new("walker"))
        );
        assert_eq!(
            catalog.unspawnable().collect::<Vec<_>>(),
            vec![&EnemyKind::new("runner")]
        );

        catalog.default_kind = Some(EnemyKind::new("runner"));
        assert_eq!(catalog.resolve(Some(&EnemyKind::new("ghost"))), None);
    }

    #[test]
    fn default_missing_from_table_is_unresolvable() {
        let catalog = catalog(Some("ghost"));
        assert_eq!(catalog.resolve(None), None);
    }
}
