//! Structured logging setup.
//!
//! Every module logs through `tracing` macros with key/value fields. This module
//! installs the process-wide subscriber: an `EnvFilter` built from `RUST_LOG`
//! (falling back to [`RuntimeConfig::log_level`]) and a JSON or pretty `fmt` layer.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::runtime_config::{LogFormat, RuntimeConfig, DEFAULT_LOG_LEVEL};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Filter used when `RUST_LOG` is unset. `level` takes full directive syntax
/// (`corridor=debug,warn`); an unparsable value falls back to `info`.
fn fallback_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level.trim()).unwrap_or_else(|e| {
        eprintln!("invalid log level {level:?} ({e}), using {DEFAULT_LOG_LEVEL}");
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    })
}

/// Install the global subscriber.
///
/// Safe to call more than once: only the first call installs anything, later
/// calls return `Ok(())`.
///
/// ```no_run
/// use corridor::{logging::init_logging, runtime_config::RuntimeConfig};
///
/// init_logging(&RuntimeConfig::from_env()).expect("logging");
/// ```
pub fn init_logging(config: &RuntimeConfig) -> Result<()> {
    INSTALLED
        .get_or_try_init(|| {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter(&config.log_level));

            let fmt_layer = match config.log_format {
                LogFormat::Json => tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .boxed(),
                LogFormat::Pretty => tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .boxed(),
            };

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize logging")
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_keeps_per_target_directives() {
        let filter = fallback_filter(" corridor=debug,warn ").to_string();
        assert!(filter.contains("corridor=debug"), "{filter}");
        assert!(filter.contains("warn"), "{filter}");
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        assert_eq!(fallback_filter("corridor=loud").to_string(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn second_init_is_a_noop() {
        let config = RuntimeConfig::default();
        // Another test binary may already own the global subscriber; only the
        // repeat call is required to be infallible.
        let _first = init_logging(&config);
        if INSTALLED.get().is_some() {
            assert!(init_logging(&config).is_ok());
        }
    }
}
