//! Configuration file loading with precedence handling.

use crate::model::ZoomLevel;
use crate::timeline::{current_year, TimelineBounds, CARD_GAP, MIN_CARD_WIDTH, TIMELINE_START_YEAR};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "CHRONICLE_CONFIG";
/// Environment variable overriding the library file.
pub const LIBRARY_ENV: &str = "CHRONICLE_LIBRARY";
/// Environment variable overriding the initial zoom level.
pub const ZOOM_ENV: &str = "CHRONICLE_ZOOM";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Values parse individually but make no sense together.
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chronicle/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Library JSON file.
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Initial zoom level.
    #[serde(default)]
    pub zoom: Option<ZoomLevel>,

    /// First year on the timeline.
    #[serde(default)]
    pub timeline_start_year: Option<i32>,

    /// Last year on the timeline.
    #[serde(default)]
    pub timeline_end_year: Option<i32>,

    /// Minimum card width in pixels.
    #[serde(default)]
    pub min_card_width: Option<f64>,

    /// Horizontal gap between cards sharing a row, in pixels.
    #[serde(default)]
    pub card_gap: Option<f64>,

    /// Classification backend.
    #[serde(default)]
    pub classifier: Option<ClassifierSection>,

    /// Bibliographic lookup backend.
    #[serde(default)]
    pub lookup: Option<LookupSection>,
}

/// `[classifier]` table.
///
/// ```toml
/// [classifier]
/// model = "claude-haiku-4-5-20251001"
/// api_key_env = "ANTHROPIC_API_KEY"
/// batch_size = 15
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierSection {
    /// Model identifier.
    #[serde(default)]
    pub model: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Messages endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Reply token limit.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Books per request.
    #[serde(default)]
    pub batch_size: Option<usize>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// `[lookup]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LookupSection {
    /// Open Library base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Cover image base URL.
    #[serde(default)]
    pub covers_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Resolved classification backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Model identifier.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Messages endpoint URL.
    pub endpoint: String,
    /// Reply token limit.
    pub max_tokens: u32,
    /// Books per request.
    pub batch_size: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "claude-haiku-4-5-20251001".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            max_tokens: 1000,
            batch_size: crate::era::MAX_ERA_BATCH_SIZE,
            timeout_secs: 60,
        }
    }
}

/// Resolved lookup backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Open Library base URL.
    pub base_url: String,
    /// Cover image base URL.
    pub covers_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Library JSON file.
    pub library_path: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Initial zoom level.
    pub zoom: ZoomLevel,
    /// Years covered by the timeline.
    pub bounds: TimelineBounds,
    /// Minimum card width in pixels.
    pub min_card_width: f64,
    /// Gap between cards sharing a row, in pixels.
    pub card_gap: f64,
    /// Classification backend.
    pub classifier: ClassifierConfig,
    /// Lookup backend.
    pub lookup: LookupConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            library_path: default_library_path(),
            log_file_path: default_log_path(),
            zoom: ZoomLevel::default(),
            bounds: TimelineBounds::default(),
            min_card_width: MIN_CARD_WIDTH,
            card_gap: CARD_GAP,
            classifier: ClassifierConfig::default(),
            lookup: LookupConfig::default(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chronicle/chronicle.log` on Linux, the platform
/// equivalent elsewhere, or `chronicle.log` in the working directory when no
/// state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chronicle").join("chronicle.log")
    } else {
        PathBuf::from("chronicle.log")
    }
}

/// Resolve default library path (`<data_dir>/chronicle/library.json`).
pub fn default_library_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("chronicle").join("library.json")
    } else {
        PathBuf::from("library.json")
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

/// Resolve default config file path (`~/.config/chronicle/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chronicle").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CHRONICLE_CONFIG` environment variable
/// 3. Default path
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

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an empty year range or a
/// non-positive card width.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let start_year = config.timeline_start_year.unwrap_or(TIMELINE_START_YEAR);
    let end_year = config.timeline_end_year.unwrap_or_else(current_year);
    if start_year >= end_year {
        return Err(ConfigError::InvalidValue(format!(
            "timeline_start_year ({start_year}) must be before timeline_end_year ({end_year})"
        )));
    }

    let min_card_width = config.min_card_width.unwrap_or(defaults.min_card_width);
    if min_card_width.is_nan() || min_card_width <= 0.0 {
        return Err(ConfigError::InvalidValue(format!(
            "min_card_width must be positive, got {min_card_width}"
        )));
    }

    let classifier = match config.classifier {
        Some(section) => {
            let base = defaults.classifier;
            ClassifierConfig {
                model: section.model.unwrap_or(base.model),
                api_key_env: section.api_key_env.unwrap_or(base.api_key_env),
                endpoint: section.endpoint.unwrap_or(base.endpoint),
                max_tokens: section.max_tokens.unwrap_or(base.max_tokens),
                batch_size: section.batch_size.unwrap_or(base.batch_size).max(1),
                timeout_secs: section.timeout_secs.unwrap_or(base.timeout_secs),
            }
        }
        None => defaults.classifier,
    };

    let lookup = match config.lookup {
        Some(section) => {
            let base = defaults.lookup;
            LookupConfig {
                base_url: section.base_url.unwrap_or(base.base_url),
                covers_url: section.covers_url.unwrap_or(base.covers_url),
                timeout_secs: section.timeout_secs.unwrap_or(base.timeout_secs),
            }
        }
        None => defaults.lookup,
    };

    Ok(ResolvedConfig {
        library_path: config.library_path.unwrap_or(defaults.library_path),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        zoom: config.zoom.unwrap_or(defaults.zoom),
        bounds: TimelineBounds::new(start_year, end_year),
        min_card_width,
        card_gap: config.card_gap.unwrap_or(defaults.card_gap).max(0.0),
        classifier,
        lookup,
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CHRONICLE_LIBRARY`: library file
/// - `CHRONICLE_ZOOM`: initial zoom (`century` or `decade`; other values are
///   logged and ignored)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(path) = std::env::var(LIBRARY_ENV) {
        if !path.is_empty() {
            config.library_path = PathBuf::from(path);
        }
    }

    if let Ok(zoom) = std::env::var(ZOOM_ENV) {
        match zoom.parse::<ZoomLevel>() {
            Ok(level) => config.zoom = level,
            Err(e) => warn!(error = %e, "Ignoring {ZOOM_ENV}"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    library_override: Option<PathBuf>,
    zoom_override: Option<ZoomLevel>,
) -> ResolvedConfig {
    if let Some(path) = library_override {
        config.library_path = path;
    }

    if let Some(zoom) = zoom_override {
        config.zoom = zoom;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
