use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIRECTORY: &str = "logs";
const DEFAULT_FILTER: &str = "info,bevy_asset=warn,bevy_app=warn";

/// Path of the log file for a run tagged with `suffix`, or with the
/// current timestamp when no suffix is given.
pub fn log_file_path(directory: &Path, suffix: Option<&str>) -> PathBuf {
    let suffix = suffix.map_or_else(
        || Local::now().format("%Y-%m-%d_%H-%M-%S").to_string(),
        str::to_string,
    );
    directory.join(format!("game_run_{}.log", suffix))
}

// Installs the global subscriber: one plain text file per run plus stdout.
// The returned guard must be kept alive for the file writer to flush.
pub fn setup_logging(suffix: Option<String>) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_directory = Path::new(LOG_DIRECTORY);

    if !log_directory.exists() {
        fs::create_dir_all(log_directory)?;
    }

    let log_file_path = log_file_path(log_directory, suffix.as_deref());

    let file = match fs::File::create(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to create log file {:?}: {}", log_file_path, e);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            let subscriber = tracing_subscriber::registry()
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
                .with(fmt::Layer::new().with_writer(non_blocking_writer));
            tracing::subscriber::set_global_default(subscriber)?;
            return Ok(guard);
        }
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            fmt::Layer::new()
                .with_writer(non_blocking_writer)
                .without_time()
                .with_ansi(false),
        )
        .with(fmt::Layer::new().with_writer(std::io::stdout));

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Logging initialized. Log file: {:?}", log_file_path);

    Ok(guard)
}
