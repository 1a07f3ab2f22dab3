//! Logging setup built on `env_logger`
//!
//! `RUST_LOG` always wins; the level passed in only applies when the
//! environment sets nothing.

pub use log::{debug, error, info, trace, warn};

use env_logger::{Builder, Env};

/// Initialize the logging system with an `info` default
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system with `level` as the default filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(level: &str) {
    let result = Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::trace!("Logger already initialized");
    }
}
