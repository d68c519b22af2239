//! Configuration loading, defaults, and CLI overrides for the orrery.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AssetConfig, Config, DebugConfig, LightConfig, SimConfig, WindowConfig};
pub use error::ConfigError;
