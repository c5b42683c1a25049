//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFile;
use crate::infrastructure::paths::LOG_FILE_NAME;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LEVEL: &str = "info";

/// Builds the level filter.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// An unparsable directive falls through to the next source.
#[must_use]
pub fn build_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Installs the global tracing subscriber.
///
/// With `log_to_file` set, events go to `<data_dir>/student-helper.log`
/// through a [`RotatingFile`]; otherwise, or when the data directory cannot
/// be created, to stderr.
///
/// Idempotent: only the first call in a process takes effect. Never fails;
/// logging is not worth refusing to start over.
///
/// # Example
///
/// ```rust
/// use student_helper::observability::init_tracing;
/// use student_helper::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     log_to_file: false,
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = build_filter(config);

    let log_file = config
        .log_to_file
        .then(|| config.resolved_data_dir())
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| RotatingFile::new(dir.join(LOG_FILE_NAME)));

    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));
    let file_layer = log_file.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn config_level_is_used_without_env() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = Config {
            trace_level: Some("debug".to_string()),
            ..Config::default()
        };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn bad_level_falls_back_to_default() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = Config {
            trace_level: Some("student_helper=loud".to_string()),
            ..Config::default()
        };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::INFO));
    }
}
