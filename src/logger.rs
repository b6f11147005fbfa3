//! Logging initialization.
//!
//! Installs a [`fern`] dispatcher behind the `log` facade. When logging is
//! disabled in the configuration the dispatcher is still installed, with
//! everything filtered out, so `log` macro call sites stay valid either way.

use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;

use crate::config::LoggingConfig;

/// Install the global logger according to the configuration. Must be called
/// at most once per process.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = if config.enabled {
        LevelFilter::Info
    } else {
        LevelFilter::Off
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Utc::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("Failed to install logger")
}
