//! Command-line overrides applied on top of the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Real-time solar system visualization.
#[derive(Debug, Parser, Default)]
#[command(name = "orrery", version, about)]
pub struct CliArgs {
    /// Path to the config file (defaults to the user config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen mode.
    #[arg(long)]
    pub fullscreen: bool,

    /// Directory to load body textures from.
    #[arg(long)]
    pub texture_dir: Option<PathBuf>,

    /// Simulation speed multiplier.
    #[arg(long)]
    pub time_scale: Option<f32>,

    /// Seed for the procedural star skybox.
    #[arg(long)]
    pub star_seed: Option<u64>,

    /// Log filter (tracing env-filter syntax, e.g. "debug,wgpu=warn").
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Config {
    /// Apply CLI overrides on top of file-loaded values.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(width) = args.width {
            self.window.width = width;
        }
        if let Some(height) = args.height {
            self.window.height = height;
        }
        if args.fullscreen {
            self.window.fullscreen = true;
        }
        if let Some(dir) = &args.texture_dir {
            self.assets.texture_dir = dir.clone();
        }
        if let Some(scale) = args.time_scale {
            self.sim.time_scale = scale;
        }
        if let Some(seed) = args.star_seed {
            self.sim.star_seed = seed;
        }
        if let Some(level) = &args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
