//! Log setup for the waitlist client. Logs always go to stderr so the
//! console can keep stdout for tables and JSON.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured level. Everything else is
/// held at `warn` so reqwest and hyper stay quiet.
const CLIENT_TARGETS: [&str; 2] = ["waitlist", "waitlist_console"];
const DEPENDENCY_LEVEL: &str = "warn";

#[derive(Debug)]
pub enum TelemetryError {
    InvalidLevel { level: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidLevel { level, .. } => {
                write!(f, "APP_LOG_LEVEL '{level}' is not a valid log filter")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a global log subscriber is already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidLevel { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` is used verbatim when set.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => client_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

/// Expands a bare level such as `debug` into per-crate directives. A value
/// that already carries directives is taken as written.
fn client_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    let level = level.trim();
    let directives = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        CLIENT_TARGETS
            .iter()
            .fold(DEPENDENCY_LEVEL.to_string(), |acc, target| {
                format!("{acc},{target}={level}")
            })
    };

    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidLevel {
        level: level.to_string(),
        source,
    })
}
