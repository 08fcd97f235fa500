use bevy::prelude::*;

pub mod progress;

use crate::{economy::ledger::publish_currency_changes, system_set::WaveSystemSet};
use progress::WaveProgressLabel;

pub struct GameUiPlugin;

impl Plugin for GameUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<progress::WaveProgressText>();

        app.add_systems(Startup, spawn_progress_labels);
        app.add_systems(
            Update,
            (progress::apply_progress_updates, progress::sync_progress_labels)
                .chain()
                .after(publish_currency_changes)
                .in_set(WaveSystemSet::Presentation),
        );
    }
}

fn spawn_progress_labels(mut commands: Commands) {
    commands
        .spawn((
            Name::new("WaveProgress"),
            Node {
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .with_children(|parent| {
            for label in [
                WaveProgressLabel::Headline,
                WaveProgressLabel::Detail,
                WaveProgressLabel::Currency,
            ] {
                parent.spawn((label, Text::new("")));
            }
        });
}
