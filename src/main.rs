mod autoplay;

use std::time::Duration;

use autoplay::AutoplayPlugin;
use bevy::{
    app::ScheduleRunnerPlugin, asset::AssetMetaCheck, prelude::*, state::app::StatesPlugin,
};
use game::{args::get_args, core::CoreSetupPlugin};
use utils::logs::setup_logging;

const TICKS_PER_SECOND: f64 = 60.0;

fn main() -> AppExit {
    let options = get_args();

    let _logging_guard = match setup_logging(Some(options.cid.clone())) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("failed to set up logging: {}", e);
            None
        }
    };

    let autoplay = options.autoplay;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
        Duration::from_secs_f64(1.0 / TICKS_PER_SECOND),
    )))
    .add_plugins(AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..Default::default()
    })
    .add_plugins(StatesPlugin)
    .insert_resource(options)
    .add_plugins(CoreSetupPlugin);

    if autoplay {
        app.add_plugins(AutoplayPlugin::default());
    }

    app.run()
}
