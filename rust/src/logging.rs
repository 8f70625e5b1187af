//! Logging macros with verbosity level control.
//!
//! Nothing is formatted when the verbosity is below the macro's level.
//! Events go through `tracing`, so the host picks the subscriber:
//! - 0: SILENT
//! - 1: CHANGES (edge commits, critical path selection) -> `info`
//! - 2: CHECKS (cycle checks, dropped stale edges) -> `debug`
//! - 3: DEBUG (per-task chain computation) -> `trace`

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}

/// Map a verbosity level to the most detailed `tracing` level it emits.
pub fn max_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        VERBOSITY_SILENT => None,
        VERBOSITY_CHANGES => Some(tracing::Level::INFO),
        VERBOSITY_CHECKS => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Install a stderr subscriber for the given verbosity.
///
/// Returns false if a global subscriber was already installed.
#[cfg(feature = "python")]
pub fn init_logging(verbosity: u8) -> bool {
    let level = max_level(verbosity).unwrap_or(tracing::Level::ERROR);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(max_level(VERBOSITY_SILENT), None);
        assert_eq!(max_level(VERBOSITY_CHANGES), Some(tracing::Level::INFO));
        assert_eq!(max_level(VERBOSITY_CHECKS), Some(tracing::Level::DEBUG));
        assert_eq!(max_level(VERBOSITY_DEBUG), Some(tracing::Level::TRACE));
        assert_eq!(max_level(9), Some(tracing::Level::TRACE));
    }

    #[test]
    fn test_log_macros_compile() {
        let verbosity = VERBOSITY_DEBUG;
        log_changes!(verbosity, "test {}", 1);
        log_checks!(verbosity, "test {}", 2);
        log_debug!(verbosity, count = 3, "test");
    }
}
