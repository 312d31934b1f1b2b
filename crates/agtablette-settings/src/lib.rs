//! AGtablette Settings Crate
//!
//! Handles application configuration: zoom bounds, tool timings and the
//! environment description, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{CanvasSize, Config, EnvironmentSettings, ToolSettings, WorkspaceSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
