//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "GRIDCORE_CONFIG";

/// Environment variable overriding the default row height estimate.
pub const ROW_HEIGHT_ENV: &str = "GRIDCORE_ROW_HEIGHT";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/gridcore/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Rows rendered above and below the viewport.
    #[serde(default)]
    pub offset_rows: Option<usize>,

    /// Height assumed for rows that have not been measured.
    #[serde(default)]
    pub default_row_height: Option<usize>,

    /// Width of the selection checkbox gutter.
    #[serde(default)]
    pub checkbox_width: Option<u32>,

    /// Border height added to every measured row.
    #[serde(default)]
    pub row_border: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved engine settings after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSettings {
    /// Rows rendered above and below the viewport.
    pub offset_rows: usize,
    /// Height assumed for rows that have not been measured.
    pub default_row_height: usize,
    /// Width of the selection checkbox gutter.
    pub checkbox_width: u32,
    /// Border height added to every measured row.
    pub row_border: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            offset_rows: 2,
            default_row_height: 48,
            checkbox_width: 42,
            row_border: 1,
            log_file_path: default_log_path(),
        }
    }
}

impl GridSettings {
    /// Defaults for the terminal viewer, where one cell is one layout unit.
    pub fn terminal() -> Self {
        Self {
            default_row_height: 1,
            checkbox_width: 4,
            row_border: 0,
            ..Self::default()
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/gridcore/gridcore.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("gridcore").join("gridcore.log")
    } else {
        PathBuf::from("gridcore.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/gridcore/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridcore").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `GRIDCORE_CONFIG` environment variable
/// 3. Default path `~/.config/gridcore/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved settings.
///
/// Checks for:
/// - `GRIDCORE_ROW_HEIGHT`: Override the default row height estimate
///
/// Unparsable values are logged and ignored.
pub fn apply_env_overrides(mut settings: GridSettings) -> GridSettings {
    if let Ok(raw) = std::env::var(ROW_HEIGHT_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(height) => settings.default_row_height = height,
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid GRIDCORE_ROW_HEIGHT"),
        }
    }

    settings
}

/// Merge config file into defaults to create resolved settings.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> GridSettings {
    merge_config_onto(GridSettings::default(), config_file)
}

/// Merge config file over `defaults`.
pub fn merge_config_onto(defaults: GridSettings, config_file: Option<ConfigFile>) -> GridSettings {
    let Some(config) = config_file else {
        return defaults;
    };

    GridSettings {
        offset_rows: config.offset_rows.unwrap_or(defaults.offset_rows),
        default_row_height: config
            .default_row_height
            .unwrap_or(defaults.default_row_height),
        checkbox_width: config.checkbox_width.unwrap_or(defaults.checkbox_width),
        row_border: config.row_border.unwrap_or(defaults.row_border),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved settings.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut settings: GridSettings,
    row_height_override: Option<usize>,
    log_file_override: Option<PathBuf>,
) -> GridSettings {
    if let Some(height) = row_height_override {
        settings.default_row_height = height;
    }

    if let Some(path) = log_file_override {
        settings.log_file_path = path;
    }

    settings
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
