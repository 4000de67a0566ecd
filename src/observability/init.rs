//! Tracing initialization and subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::file_writer::RotatingFile;
use crate::Config;

/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "dexy.log";

/// Installs the global subscriber: an `EnvFilter` and a JSON fmt layer
/// writing to a rotating file in the data directory.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.log_level`
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently does nothing if the directory cannot be created
/// - Only the first call takes effect
///
/// # Example
///
/// ```rust
/// use dexy::observability::init_tracing;
/// use dexy::Config;
///
/// let dir = std::env::temp_dir().join("dexy-doc-logs");
/// let config = Config {
///     log_level: Some("debug".to_string()),
///     data_dir: Some(dir),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = crate::infrastructure::paths::data_dir(config);
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_level.as_deref().unwrap_or("info"))
    });

    let writer = RotatingFile::new(data_dir.join(LOG_FILE_NAME));
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(writer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .try_init();
}
