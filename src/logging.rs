//! Logging setup
//!
//! The library only emits through the `log` facade; hosts that want to see
//! the output call [`init_logging`] once.
//!
//! [`init_logging`]: fn.init_logging.html

use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `agg_backend=debug`; falls back to `RUST_LOG`
    pub env_filter: Option<String>,
    /// Colored output
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, write_style: env_logger::WriteStyle::Auto }
    }
}

/// Install the process wide logger
///
/// Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.write_style(config.write_style);
        if let Some(filter) = config.env_filter.as_deref() {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(LevelFilter::Info);
        }
        // A logger may already be installed by the host
        let _ = builder.try_init();
        log::debug!("logging initialized");
    });
}
