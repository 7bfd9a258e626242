//! File logging: the terminal belongs to the game, so traces go to
//! `<log dir>/<session>/client.log`.
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn setup_logging(session_id: &str, log_dir: Option<&Path>) -> Result<WorkerGuard> {
    let session_log_dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(log_directory)
        .join(session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/client.log", session_log_dir.display());

    Ok(guard)
}

/// Platform cache directory, e.g. `~/.cache/combat/logs` on Linux.
fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "combat")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("combat").join("logs"))
}
