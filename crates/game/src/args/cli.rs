use clap::Parser;

#[derive(Parser, Debug)]
#[clap(about = "Headless wave survival run")]
pub struct Opt {
    /// Level config, relative to the assets folder
    #[clap(short, long, default_value = "waves/default.waves.ron")]
    pub waves: String,
    #[clap(long)]
    pub cid: Option<String>,
    /// Seed of the spawn point picker
    #[clap(long)]
    pub seed: Option<u64>,
    /// Play the run with scripted kills, purchases and shop exits
    #[clap(long)]
    pub autoplay: bool,
    #[clap(long)]
    pub max_frames: Option<u32>,
    /// Keep ticking after the waves are over
    #[clap(long)]
    pub keep_running: bool,
}
