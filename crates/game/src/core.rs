use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use utils::{frame::FrameCount, rng::GameRng};

use crate::{
    args::LaunchOptions,
    character::BaseCharacterGamePlugin,
    economy::EconomyPlugin,
    frame::increase_frame_system,
    global_asset::{add_global_asset, loading_asset_system},
    shop::ShopPlugin,
    system_set::WaveSystemSet,
    ui::GameUiPlugin,
    waves::{WaveConfig, WaveProgressUpdate, WaveSystemPlugin},
};

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading, // Waiting for the wave config to be resolved
    InGame,  // Level installed, waves running
    Halted,  // The wave config could not be loaded
}

// Gameplay of one level: characters, economy, shop and waves, ordered in
// `WaveSystemSet`. Runs without assets or states so it can be driven
// headless with a config installed by hand.
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameCount>();
        app.init_resource::<GameRng>();

        app.configure_sets(
            Update,
            (
                WaveSystemSet::Setup,
                WaveSystemSet::DeathManagement,
                WaveSystemSet::Shop,
                WaveSystemSet::Orchestration,
                WaveSystemSet::Presentation,
                WaveSystemSet::FrameCounter,
            )
                .chain(),
        );

        app.add_plugins(BaseCharacterGamePlugin);
        app.add_plugins(EconomyPlugin);
        app.add_plugins(ShopPlugin);
        app.add_plugins(WaveSystemPlugin);
        app.add_plugins(GameUiPlugin);

        app.add_systems(
            Update,
            increase_frame_system.in_set(WaveSystemSet::FrameCounter),
        );
    }
}

// Core plugin for the game binary
// Loads the level config from the assets, installs it and runs the gameplay.
// Requires the asset and state plugins.
#[derive(Default)]
pub struct CoreSetupPlugin;

impl Plugin for CoreSetupPlugin {
    fn build(&self, app: &mut App) {
        let options = app
            .world()
            .get_resource::<LaunchOptions>()
            .cloned()
            .unwrap_or_default();

        let rng = GameRng::new(options.seed);
        info!("run {} rng seed={}", options.cid, rng.seed());
        app.insert_resource(rng);
        app.insert_resource(options);

        app.add_plugins(RonAssetPlugin::<WaveConfig>::new(&["waves.ron"]));
        app.add_plugins(GameplayPlugin);

        app.init_state::<AppState>();

        app.add_systems(Startup, add_global_asset);

        app.add_systems(
            Update,
            loading_asset_system
                .run_if(in_state(AppState::Loading))
                .before(WaveSystemSet::Setup),
        );
        app.add_systems(
            Update,
            (exit_when_waves_end, exit_after_frame_limit).in_set(WaveSystemSet::FrameCounter),
        );
    }
}

fn exit_when_waves_end(
    mut updates: MessageReader<WaveProgressUpdate>,
    options: Res<LaunchOptions>,
    mut exit: MessageWriter<AppExit>,
) {
    if options.keep_running {
        updates.clear();
        return;
    }
    let finished = updates.read().any(|update| {
        matches!(
            update,
            WaveProgressUpdate::Completed
                | WaveProgressUpdate::GameOver
                | WaveProgressUpdate::Halted { .. }
        )
    });
    if finished {
        info!("waves are over, exiting");
        exit.write(AppExit::Success);
    }
}

fn exit_after_frame_limit(
    frame: Res<FrameCount>,
    options: Res<LaunchOptions>,
    mut exit: MessageWriter<AppExit>,
) {
    if options.max_frames.is_some_and(|max| frame.frame >= max) {
        warn!("{} frame limit reached, exiting", *frame);
        exit.write(AppExit::Success);
    }
}
