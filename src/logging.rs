use crate::config::{default_log_path, AppConfig};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log file for the session: configured path, else the per-user data
/// directory.
pub fn log_path(config: &AppConfig) -> Option<PathBuf> {
    config.log_file.clone().or_else(default_log_path)
}

/// `RUST_LOG` wins over the configured level.
pub fn filter_directives(config: &AppConfig) -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone())
}

/// Sends tracing output to the log file; the terminal belongs to the UI.
/// Without a usable log location nothing is installed.
pub fn init_logging(config: &AppConfig) -> AppResult<Option<PathBuf>> {
    let Some(path) = log_path(config) else {
        return Ok(None);
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| AppError::io(dir, err))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| AppError::io(&path, err))?;

    let env_filter = EnvFilter::builder().parse_lossy(filter_directives(config));
    // Already installed (tests, embedding) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(Some(path))
}
