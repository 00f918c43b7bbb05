use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://waitlist-api-qiep.onrender.com";
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_ADMIN_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the widget and dashboard clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub telemetry: TelemetryConfig,
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = normalize_base_url(
            &env::var("WAITLIST_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        )?;
        let submit_timeout_ms = positive_var(
            "WAITLIST_SUBMIT_TIMEOUT_MS",
            DEFAULT_SUBMIT_TIMEOUT_MS,
            ConfigError::InvalidSubmitTimeout,
        )?;
        let admin_timeout_ms = positive_var(
            "WAITLIST_ADMIN_TIMEOUT_MS",
            DEFAULT_ADMIN_TIMEOUT_MS,
            ConfigError::InvalidAdminTimeout,
        )?;
        let interval_secs = positive_var(
            "WAITLIST_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
            ConfigError::InvalidPollInterval,
        )?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                submit_timeout: Duration::from_millis(submit_timeout_ms),
                admin_timeout: Duration::from_millis(admin_timeout_ms),
            },
            polling: PollingConfig {
                interval: Duration::from_secs(interval_secs),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the Waitlist Service lives and how long a single exchange may take.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub submit_timeout: Duration,
    pub admin_timeout: Duration,
}

impl ApiConfig {
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub interval: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingBaseUrl,
    InvalidSubmitTimeout,
    InvalidAdminTimeout,
    InvalidPollInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBaseUrl => write!(f, "WAITLIST_API_BASE must not be empty"),
            ConfigError::InvalidSubmitTimeout => {
                write!(f, "WAITLIST_SUBMIT_TIMEOUT_MS must be a positive integer")
            }
            ConfigError::InvalidAdminTimeout => {
                write!(f, "WAITLIST_ADMIN_TIMEOUT_MS must be a positive integer")
            }
            ConfigError::InvalidPollInterval => {
                write!(f, "WAITLIST_POLL_INTERVAL_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn positive_var(name: &str, default: u64, invalid: ConfigError) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(invalid),
        },
        Err(_) => Ok(default),
    }
}
