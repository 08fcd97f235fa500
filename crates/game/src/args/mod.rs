use bevy::prelude::*;
use utils::cid::generate_random_correlation_id;

mod cli;

pub const DEFAULT_WAVES_PATH: &str = "waves/default.waves.ron";

/// Launch parameters of one run.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub waves: String,
    pub cid: String,
    pub seed: Option<u64>,
    pub autoplay: bool,
    pub max_frames: Option<u32>,
    pub keep_running: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            waves: DEFAULT_WAVES_PATH.to_string(),
            cid: generate_random_correlation_id(),
            seed: None,
            autoplay: false,
            max_frames: None,
            keep_running: false,
        }
    }
}

impl From<cli::Opt> for LaunchOptions {
    fn from(args: cli::Opt) -> Self {
        Self {
            waves: args.waves,
            cid: args.cid.unwrap_or_else(generate_random_correlation_id),
            seed: args.seed,
            autoplay: args.autoplay,
            max_frames: args.max_frames,
            keep_running: args.keep_running,
        }
    }
}

pub fn get_args() -> LaunchOptions {
    use clap::Parser;
    cli::Opt::parse().into()
}
