//! Observability: structured logging via `tracing`.
//!
//! Initialization happens once per process; the CLI calls [`init`] before
//! running a command. Downgraded failures (transport and decode errors that
//! become "no data") are logged at `warn`, diagnostics at `debug`.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `quakelens=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Creates a config with the given filter directive.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::Text,
        }
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Initializes process-wide logging.
///
/// `verbose` lowers the default filter to `debug`. `RUST_LOG` overrides the
/// configured directive when set.
///
/// # Errors
///
/// Returns [`Error::Config`] if logging has already been initialized.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    if LOGGING_INIT.set(()).is_err() {
        return Err(Error::Config {
            operation: "logging_init".to_string(),
            cause: "logging already initialized".to_string(),
        });
    }

    let directive = if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }

    Ok(())
}
