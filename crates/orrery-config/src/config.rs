//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Simulation settings.
    pub sim: SimConfig,
    /// Point light and ambient settings.
    pub light: LightConfig,
    /// Asset locations.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Window title.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            title: "Orrery".to_string(),
        }
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Multiplier applied to elapsed seconds before the scene update.
    pub time_scale: f32,
    /// Whether the animation runs on startup.
    pub animation_on_start: bool,
    /// Seed for the procedural star skybox.
    pub star_seed: u64,
    /// Number of stars baked into the skybox.
    pub star_count: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            animation_on_start: true,
            star_seed: 1977,
            star_count: 20_000,
        }
    }
}

/// Point light configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    /// Initial light radius in scene units.
    pub radius: f32,
    /// Initial ambient intensity in `[0, 1]`.
    pub ambient: f32,
    /// Light movement speed, units per second of held key.
    pub movement_rate: f32,
    /// Radius growth speed, units per second of held key.
    pub modulation_rate: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            radius: 25_000.0,
            ambient: 0.08,
            movement_rate: 10.0,
            modulation_rate: 255.0,
        }
    }
}

/// Asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory the body texture identifiers are resolved under.
    pub texture_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets/textures"),
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter override (tracing env-filter syntax); empty uses the default.
    pub log_level: String,
    /// Write a JSON log file in debug builds.
    pub file_logging: bool,
}

impl Config {
    /// The default config file path: `<user config dir>/orrery/config.ron`,
    /// falling back to the working directory when no home exists.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("orrery")
            .join("config.ron")
    }

    /// Load a config from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save the config as RON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }
        let pretty = ron::ser::PrettyConfig::default();
        let content = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Load the config if the file exists; otherwise write the defaults so
    /// the user has a file to edit.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::load(path)?;
            info!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            let config = Self::default();
            config.save(path)?;
            info!(path = %path.display(), "wrote default config");
            Ok(config)
        }
    }
}
