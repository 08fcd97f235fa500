use bevy::{asset::LoadState, prelude::*};

use crate::{
    args::LaunchOptions,
    core::AppState,
    waves::{HaltReason, WaveConfig, WaveOrchestrator, WaveProgressUpdate},
};

#[derive(Resource)]
pub struct GlobalAsset {
    pub wave_config: Handle<WaveConfig>,
}

impl GlobalAsset {
    pub fn create(asset_server: &AssetServer, wave_config_path: &str) -> Self {
        Self {
            wave_config: asset_server.load(wave_config_path.to_string()),
        }
    }
}

pub fn add_global_asset(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    options: Res<LaunchOptions>,
) {
    info!("loading wave config {}", options.waves);
    let global_asset = GlobalAsset::create(&asset_server, &options.waves);

    commands.insert_resource(global_asset);
}

pub fn loading_asset_system(
    mut commands: Commands,
    mut app_state: ResMut<NextState<AppState>>,
    global_assets: Res<GlobalAsset>,
    asset_server: Res<AssetServer>,
    wave_configs: Res<Assets<WaveConfig>>,
    mut orchestrator: ResMut<WaveOrchestrator>,
    mut updates: MessageWriter<WaveProgressUpdate>,
) {
    match asset_server.load_state(&global_assets.wave_config) {
        LoadState::Loaded => {}
        LoadState::Failed(err) => {
            error!("failed to load the wave config: {}", err);
            if let Some(update) = halt_without_config(&mut orchestrator, err.to_string()) {
                updates.write(update);
            }
            app_state.set(AppState::Halted);
            return;
        }
        _ => return,
    }

    let Some(config) = wave_configs.get(&global_assets.wave_config) else {
        return;
    };

    config.install(&mut commands);

    app_state.set(AppState::InGame);
    info!("loading of asset is done, now entering the game");
}

/// Halts the wave task for good when the level cannot be loaded. Returns the
/// update to publish, or nothing when the task was already halted.
fn halt_without_config(orchestrator: &mut WaveOrchestrator, cause: String) -> Option<WaveProgressUpdate> {
    let reason = HaltReason::ConfigUnavailable(cause);
    orchestrator
        .cancel(reason.clone())
        .then_some(WaveProgressUpdate::Halted { reason })
}
