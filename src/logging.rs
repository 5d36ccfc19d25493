//! Tracing setup for embeddable builds.
//!
//! The level is held in a global handle so that the `debug` flag of an `init` call
//! can raise it after the subscriber is installed. `RUST_LOG`, when set, adds an
//! [`EnvFilter`] on top.

use std::sync::{Arc, Mutex, Once, OnceLock};

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();
static LOG_LEVEL: OnceLock<Arc<Mutex<LevelFilter>>> = OnceLock::new();

fn get_log_level_handle() -> Arc<Mutex<LevelFilter>> {
    LOG_LEVEL
        .get_or_init(|| Arc::new(Mutex::new(DEFAULT_LOG_LEVEL)))
        .clone()
}

/// Updates the log level.
pub fn set_level_filter(level: LevelFilter) {
    if let Ok(mut guard) = get_log_level_handle().lock() {
        *guard = level;
    }
}

/// The current log level.
#[must_use]
pub fn log_level() -> LevelFilter {
    get_log_level_handle()
        .lock()
        .map(|guard| *guard)
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Returns `true` when `filter` lets events of `level` through.
#[must_use]
pub const fn level_allows(filter: LevelFilter, level: Level) -> bool {
    match filter {
        LevelFilter::OFF => false,
        LevelFilter::ERROR => matches!(level, Level::ERROR),
        LevelFilter::WARN => matches!(level, Level::ERROR | Level::WARN),
        LevelFilter::INFO => matches!(level, Level::ERROR | Level::WARN | Level::INFO),
        LevelFilter::DEBUG => matches!(
            level,
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG
        ),
        LevelFilter::TRACE => true,
    }
}

/// Installs a stderr subscriber gated by [`log_level`] (idempotent).
pub fn install_tracing() {
    TRACING_INSTALLED.call_once(|| {
        let console = fmt::layer()
            .with_ansi(false)
            .with_filter(filter_fn(|metadata| {
                level_allows(log_level(), *metadata.level())
            }));

        let result = match EnvFilter::try_from_default_env() {
            Ok(env) => tracing_subscriber::registry()
                .with(console)
                .with(env)
                .try_init(),
            Err(_) => tracing_subscriber::registry().with(console).try_init(),
        };

        if result.is_err() {
            eprintln!("waterui-embed tracing subscriber failed to initialize");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_follow_severity() {
        assert!(level_allows(LevelFilter::WARN, Level::ERROR));
        assert!(level_allows(LevelFilter::WARN, Level::WARN));
        assert!(!level_allows(LevelFilter::WARN, Level::INFO));
        assert!(!level_allows(LevelFilter::OFF, Level::ERROR));
        assert!(level_allows(LevelFilter::TRACE, Level::TRACE));
    }

    #[test]
    fn debug_level_sticks() {
        set_level_filter(LevelFilter::DEBUG);
        assert_eq!(log_level(), LevelFilter::DEBUG);
        assert!(level_allows(log_level(), Level::DEBUG));
    }

    #[test]
    fn installing_twice_is_harmless() {
        install_tracing();
        install_tracing();
    }
}
