//! The binary entry point for the orrery.

use clap::Parser;
use orrery_config::{CliArgs, Config};
use tracing::error;

fn main() {
    let args = CliArgs::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_path.display());
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_path.parent().map(|dir| dir.join("logs"));
    orrery_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Err(e) = orrery_app::run(config) {
        error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
