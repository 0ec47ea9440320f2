//! Configuration file support for the viewport.
//!
//! Settings are stored as versioned JSON. Every field has a default, so a
//! config file only needs to name the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::overlay::OverlayContent;
use crate::viewport::ScrollbarPolicy;
use crate::zoom_math::ScaleBounds;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Wheel zoom behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Scale multiplier per wheel notch
    pub step: f32,
    /// Scale multiplier per notch while Ctrl is held
    pub precise_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl ZoomConfig {
    pub fn bounds(&self) -> ScaleBounds {
        ScaleBounds::new(self.min_scale, self.max_scale)
    }

    /// Steps must zoom in (finite, above 1) and the scale range must be a
    /// finite positive interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, step) in [("zoom.step", self.step), ("zoom.precise_step", self.precise_step)] {
            if !step.is_finite() || step <= 1.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be a finite factor above 1, got {}",
                    name, step
                )));
            }
        }
        for (name, scale) in [("zoom.min_scale", self.min_scale), ("zoom.max_scale", self.max_scale)] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be finite and positive, got {}",
                    name, scale
                )));
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::InvalidValue(format!(
                "zoom.min_scale {} exceeds zoom.max_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: constants::DEFAULT_ZOOM_FACTOR,
            precise_step: constants::DEFAULT_ZOOM_CTRL_FACTOR,
            min_scale: constants::DEFAULT_MIN_SCALE,
            max_scale: constants::DEFAULT_MAX_SCALE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarConfig {
    pub policy: ScrollbarPolicy,
    /// Thickness of a visible scrollbar in viewport pixels
    pub extent: f32,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            policy: ScrollbarPolicy::AsNeeded,
            extent: constants::DEFAULT_SCROLLBAR_EXTENT,
        }
    }
}

/// Viewport configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Version of the configuration file format
    pub version: u32,
    pub zoom: ZoomConfig,
    pub scrollbars: ScrollbarConfig,
    /// Straight RGBA8 color the viewport is cleared with
    pub background: [u8; 4],
    /// Offer the reset-view context menu
    pub context_menu: bool,
    pub reset_view_label: String,
    pub overlay: OverlayContent,
    /// Directory searched for assets before the built-in ones
    pub asset_dir: PathBuf,
    pub log_level: LogLevel,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            zoom: ZoomConfig::default(),
            scrollbars: ScrollbarConfig::default(),
            background: constants::BACKGROUND_RGBA,
            context_menu: true,
            reset_view_label: constants::RESET_VIEW_LABEL.to_string(),
            overlay: OverlayContent::default(),
            asset_dir: PathBuf::from(constants::DEFAULT_ASSET_DIR),
            log_level: LogLevel::default(),
        }
    }
}

impl ViewportConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        config.zoom.validate()?;

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "uavview-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<PathBuf> {
        // XDG config directory, falling back to ~/.config
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("uavview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("uavview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Read and parse a config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_file(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_file(path)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting is outside its valid range
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
