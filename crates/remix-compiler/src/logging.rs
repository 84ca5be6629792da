//! Subscriber setup for binaries that embed the compiler.
//!
//! Only available with the `logging` feature. The library itself emits
//! `tracing` events and never installs a subscriber.

use std::fmt;
use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable read by [`init_logging_from_env`].
pub const LOG_ENV_VAR: &str = "REMIX_LOG";

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    /// Build and write summaries.
    #[default]
    Info,
    /// Route scans and pipeline assembly as well.
    Debug,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "trace" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {other}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Installs a compact stderr subscriber at `level`. Only the first call in a
/// process has any effect.
pub fn init_logging(level: LogLevel) {
    install(EnvFilter::new(level.as_filter()));
}

/// Like [`init_logging`], with directives from `REMIX_LOG`
/// (e.g. `REMIX_LOG=remix_compiler=debug`); falls back to `info`.
pub fn init_logging_from_env() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::default().as_filter()));
    install(filter);
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer::layer().compact().with_target(false).without_time())
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("off".parse::<LogLevel>(), Ok(LogLevel::Silent));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn displays_as_filter_directive() {
        assert_eq!(LogLevel::default().to_string(), "info");
        assert_eq!(LogLevel::Silent.to_string(), "off");
    }
}
