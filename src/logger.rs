//! Tracing subscriber setup.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{config, Error, Result};

/// All log levels
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum LogLevel {
    /// The "off" level.
    #[serde(rename = "off")]
    Off,
    /// The "trace" level.
    #[serde(rename = "trace")]
    Trace,
    /// The "debug" level.
    #[serde(rename = "debug")]
    Debug,
    /// The "info" level.
    #[serde(rename = "info")]
    #[default]
    Info,
    /// The "warn" level.
    #[serde(rename = "warn")]
    Warn,
    /// The "error" level.
    #[serde(rename = "error")]
    Error,
}

/// Log output formats
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Builds the filter directive: `override_filter`, else `RUST_LOG`, else the
/// configured level for this crate.
#[must_use]
pub fn filter_directive(config: &config::Logger) -> String {
    if let Some(filter) = &config.override_filter {
        return filter.clone();
    }
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| format!("{}={}", env!("CARGO_CRATE_NAME"), config.level))
}

/// Installs the global subscriber. Later calls are no-ops.
///
/// # Errors
///
/// Fails when the filter directive is invalid or another subscriber was
/// already installed by a different library.
pub fn init(config: &config::Logger) -> Result<()> {
    if !config.enable || INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_new(filter_directive(config))
        .map_err(|err| Error::Config(format!("invalid logger filter: {err}")))?;

    let layer = match config.format {
        Format::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        Format::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        Format::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|err| Error::Config(format!("cannot install logger: {err}")))?;
    let _ = INITIALIZED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{filter_directive, init, LogLevel};
    use crate::config;

    #[test]
    fn override_filter_wins() {
        let logger = config::Logger {
            override_filter: Some("ontoedit=trace".to_string()),
            ..config::Logger::default()
        };
        assert_eq!(filter_directive(&logger), "ontoedit=trace");
    }

    #[test]
    fn disabled_logger_is_a_noop() {
        let logger = config::Logger {
            enable: false,
            level: LogLevel::Debug,
            ..config::Logger::default()
        };
        assert!(init(&logger).is_ok());
    }
}
