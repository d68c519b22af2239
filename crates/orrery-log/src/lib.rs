//! Structured logging for the orrery.
//!
//! Console output via the `tracing` ecosystem, with an optional JSON file
//! layer in debug builds. The filter honors `RUST_LOG`, then the config
//! file's `debug.log_level`, then a quiet default.

use std::path::Path;

use orrery_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Initialize the global tracing subscriber.
///
/// `log_dir` receives a JSON log file when `debug_build` is set and the
/// config enables `debug.file_logging`. The filter falls back to
/// [`default_env_filter`] when neither `RUST_LOG` nor the config sets one.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_logging = config.map(|c| c.debug.file_logging).unwrap_or(true);
    if debug_build
        && file_logging
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("orrery.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The default filter: `info` everywhere, with wgpu/naga quieted to `warn`.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_gpu_crates() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_config_log_level_overrides_default() {
        let mut config = Config::default();
        config.debug.log_level = "debug,orrery_render=trace".to_string();
        let filter_str = if config.debug.log_level.is_empty() {
            DEFAULT_FILTER.to_string()
        } else {
            config.debug.log_level.clone()
        };
        let filter = EnvFilter::new(&filter_str);
        assert!(format!("{}", filter).contains("orrery_render=trace"));
    }

    #[test]
    fn test_env_filter_parsing_is_forgiving() {
        for filter_str in ["info", "debug,orrery_scene=trace", "warn", "error"] {
            assert!(EnvFilter::try_from(filter_str).is_ok());
        }
    }

    #[test]
    fn test_log_file_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path()).unwrap();
        let log_file_path = temp_dir.path().join("orrery.log");
        assert_eq!(log_file_path.file_name().unwrap(), "orrery.log");
    }
}
