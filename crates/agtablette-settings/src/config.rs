//! Configuration and settings management for AGtablette
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Workspace settings (zoom bounds, canvas size, color history)
//! - Tool settings (animation timings, default colors)
//! - Environment description (name and enabled modules)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Width and height of the drawing surface in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in canvas units
    pub width: f64,
    /// Height in canvas units
    pub height: f64,
}

impl CanvasSize {
    /// Create a canvas size
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Workspace settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Smallest allowed zoom level
    pub min_zoom_level: f64,
    /// Largest allowed zoom level
    pub max_zoom_level: f64,
    /// Canvas size used when nothing else is known
    pub default_canvas_size: CanvasSize,
    /// How many previously selected colors are remembered
    pub previous_colors_capacity: usize,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            min_zoom_level: 0.2,
            max_zoom_level: 10.0,
            default_canvas_size: CanvasSize::default(),
            previous_colors_capacity: 16,
        }
    }
}

impl WorkspaceSettings {
    /// Clamp a zoom level into the configured bounds. `None` for NaN, which
    /// has no place in the range.
    pub fn clamp_zoom(&self, zoom: f64) -> Option<f64> {
        if zoom.is_nan() {
            return None;
        }
        Some(zoom.min(self.max_zoom_level).max(self.min_zoom_level))
    }

    /// Check the zoom bounds, canvas size and color capacity.
    pub fn validate(&self) -> ConfigResult<()> {
        positive_finite("workspace.min_zoom_level", self.min_zoom_level)?;
        positive_finite("workspace.max_zoom_level", self.max_zoom_level)?;
        if self.min_zoom_level > self.max_zoom_level {
            return Err(ConfigError::Inconsistent(format!(
                "min_zoom_level {} exceeds max_zoom_level {}",
                self.min_zoom_level, self.max_zoom_level
            )));
        }

        let size = self.default_canvas_size;
        if !(size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "workspace.default_canvas_size".to_string(),
                value: format!("{}x{}", size.width, size.height),
            });
        }

        if self.previous_colors_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "workspace.previous_colors_capacity".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Rejects zero, negative, NaN and infinite values.
fn positive_finite(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Duration of the reverse animation in seconds
    pub reverse_duration_secs: f64,
    /// Color given to templates that do not carry one
    pub default_family_color: String,
}

impl ToolSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        positive_finite("tools.reverse_duration_secs", self.reverse_duration_secs)
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            reverse_duration_secs: 4.0,
            default_family_color: "#aaa".to_string(),
        }
    }
}

/// Environment description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// Environment name (Grandeurs, Tangram, Cube, Geometrie)
    pub name: String,
    /// Modules (shape families) available in this environment
    pub modules: Vec<String>,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            name: "Grandeurs".to_string(),
            modules: vec!["Formes standard".to_string()],
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Workspace settings
    pub workspace: WorkspaceSettings,
    /// Tool settings
    pub tools: ToolSettings,
    /// Environment description
    pub environment: EnvironmentSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("agtablette").join("config.toml"))
            .ok_or(SettingsError::NoConfigDirectory)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config at `path`, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        let write_error = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)?;
        tracing::debug!("Saved config to {}", path.display());

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.workspace.validate()?;
        self.tools.validate()
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workspace.previous_colors_capacity, 16);
        assert_eq!(config.tools.reverse_duration_secs, 4.0);
    }

    #[test]
    fn test_validate_rejects_inverted_zoom_bounds() {
        let mut config = Config::default();
        config.workspace.min_zoom_level = 5.0;
        config.workspace.max_zoom_level = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_min_zoom() {
        let mut config = Config::default();
        config.workspace.min_zoom_level = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_zoom() {
        let ws = WorkspaceSettings::default();
        assert_eq!(ws.clamp_zoom(100.0), Some(ws.max_zoom_level));
        assert_eq!(ws.clamp_zoom(0.01), Some(ws.min_zoom_level));
        assert_eq!(ws.clamp_zoom(1.5), Some(1.5));
        assert_eq!(ws.clamp_zoom(f64::INFINITY), Some(ws.max_zoom_level));
        assert_eq!(ws.clamp_zoom(f64::NEG_INFINITY), Some(ws.min_zoom_level));
        assert_eq!(ws.clamp_zoom(f64::NAN), None);
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        for (min, max) in [(f64::NAN, 10.0), (0.2, f64::NAN), (0.2, f64::INFINITY)] {
            let mut config = Config::default();
            config.workspace.min_zoom_level = min;
            config.workspace.max_zoom_level = max;
            assert!(
                matches!(config.validate(), Err(ConfigError::ValueOutOfRange { .. })),
                "min {} max {}",
                min,
                max
            );
        }

        let mut config = Config::default();
        config.tools.reverse_duration_secs = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.workspace.default_canvas_size = CanvasSize::new(f64::INFINITY, 800.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[tools]\nreverse_duration_secs = 2.5\n").unwrap();
        assert_eq!(config.tools.reverse_duration_secs, 2.5);
        assert_eq!(config.workspace, WorkspaceSettings::default());
    }
}
