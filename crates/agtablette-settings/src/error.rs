//! Errors raised while locating, reading, writing or validating the
//! AGtablette config file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving the config file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The config file exists but could not be read.
    #[error("Cannot read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The config file or its directory could not be written.
    #[error("Cannot write config file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The platform has no per-user config directory.
    #[error("No config directory on this platform")]
    NoConfigDirectory,

    #[error("Malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Cannot encode config as TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// The config was parsed but its values are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Config values that fail validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its valid range, or not a finite number.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    /// Two settings contradict each other.
    #[error("Inconsistent settings: {0}")]
    Inconsistent(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
