//! Logging setup

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system
///
/// `level` is the default filter; `RUST_LOG` still takes precedence for
/// individual modules. Calling this more than once is harmless.
pub fn init(level: LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
}
