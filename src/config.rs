use clap::Parser;
use config::{Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// Using constants for default values makes them easy to change.
const DEFAULT_AUTO_SAVE: bool = true;
const DEFAULT_AUTO_SAVE_INTERVAL: u64 = 2;
const DEFAULT_MAX_UNDO: usize = crate::service::DEFAULT_MAX_UNDO_STEPS;
const DEFAULT_SUGGESTION_COUNT: usize = 3;
const DEFAULT_LOG_LEVEL: &str = "warn";

const APP_NAME: &str = "treemind";
const ENV_PREFIX: &str = "TREEMIND";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Optional fields allow for layered config (defaults -> file -> env -> args).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    default_file: Option<PathBuf>,
    auto_save: Option<bool>,
    auto_save_interval: Option<u64>,
    max_undo_steps: Option<usize>,
    suggestion_command: Option<String>,
    suggestion_count: Option<usize>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Map file given on the command line.
    pub filename: Option<PathBuf>,
    pub default_file: Option<PathBuf>,
    pub auto_save: bool,
    /// Minimum seconds between two automatic saves.
    pub auto_save_interval: u64,
    pub max_undo_steps: usize,
    /// Shell command producing node suggestions; AI generation is
    /// unavailable while unset.
    pub suggestion_command: Option<String>,
    pub suggestion_count: usize,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            filename: None,
            default_file: None,
            auto_save: DEFAULT_AUTO_SAVE,
            auto_save_interval: DEFAULT_AUTO_SAVE_INTERVAL,
            max_undo_steps: DEFAULT_MAX_UNDO,
            suggestion_command: None,
            suggestion_count: DEFAULT_SUGGESTION_COUNT,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// File the session reads and writes: CLI argument, then configured
    /// default, then the per-user data directory.
    pub fn map_path(&self) -> Option<PathBuf> {
        self.filename
            .clone()
            .or_else(|| self.default_file.clone())
            .or_else(default_map_path)
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Keyboard-driven mind-map editor", long_about = None)]
pub struct CliArgs {
    /// Path to the mind map JSON file to open
    pub filename: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub default_file: Option<PathBuf>,
    #[arg(long)]
    pub auto_save: Option<bool>,
    #[arg(long)]
    pub auto_save_interval: Option<u64>,
    #[arg(long)]
    pub max_undo_steps: Option<usize>,
    #[arg(long)]
    pub suggestion_command: Option<String>,
    #[arg(long)]
    pub suggestion_count: Option<usize>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the merged configuration and exit
    #[arg(long)]
    pub debug_config: bool,
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

pub fn default_map_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("current_map.json"))
}

pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("treemind.log"))
}

/// Loads configuration from all sources.
pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");
    // Missing env vars are fine; collect only fails on malformed sources.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config(args, Some(env_map))
}

fn build_config(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args
        .config
        .clone()
        .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("config.toml")));

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    // Overrides (environment or a test map) beat the file.
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;

    // args > overrides > file > defaults
    let config = AppConfig {
        filename: args.filename.clone(),
        default_file: args.default_file.clone().or(loaded.default_file),
        auto_save: args
            .auto_save
            .or(loaded.auto_save)
            .unwrap_or(DEFAULT_AUTO_SAVE),
        auto_save_interval: args
            .auto_save_interval
            .or(loaded.auto_save_interval)
            .unwrap_or(DEFAULT_AUTO_SAVE_INTERVAL),
        max_undo_steps: args
            .max_undo_steps
            .or(loaded.max_undo_steps)
            .unwrap_or(DEFAULT_MAX_UNDO),
        suggestion_command: args
            .suggestion_command
            .clone()
            .or(loaded.suggestion_command)
            .filter(|command| !command.trim().is_empty()),
        suggestion_count: args
            .suggestion_count
            .or(loaded.suggestion_count)
            .unwrap_or(DEFAULT_SUGGESTION_COUNT),
        log_file: args.log_file.clone().or(loaded.log_file),
        log_level: args
            .log_level
            .clone()
            .or(loaded.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.max_undo_steps == 0 {
        return Err(ConfigError::ValidationError(
            "max_undo_steps must be at least 1".to_string(),
        ));
    }
    if config.suggestion_count == 0 {
        return Err(ConfigError::ValidationError(
            "suggestion_count must be at least 1".to_string(),
        ));
    }
    Ok(())
}
