//! Application configuration structs
//!
//! Loads configuration from environment variables and an optional `.env` file.

use std::env;
use std::str::FromStr;

use super::detection::DetectionThresholds;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub retention: RetentionConfig,
    pub security: DetectionThresholds,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Longest retention period accepted, in days
pub const MAX_DAYS_TO_KEEP: i64 = 36_500;

/// Activity log retention
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Rows older than this many days are archived
    pub days_to_keep: i64,
    /// Seconds between sweeps in the worker
    pub sweep_interval_secs: u64,
}

impl RetentionConfig {
    /// Reject a period outside `1..=MAX_DAYS_TO_KEEP` and a zero sweep interval
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending variable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DAYS_TO_KEEP).contains(&self.days_to_keep) {
            return Err(ConfigError::InvalidValue(
                "RETENTION_DAYS_TO_KEEP",
                self.days_to_keep.to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "RETENTION_SWEEP_INTERVAL_SECS",
                self.sweep_interval_secs.to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days_to_keep: default_days_to_keep(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "shop-admin".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_days_to_keep() -> i64 {
    90
}

fn default_sweep_interval() -> u64 {
    86400 // daily
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing, a numeric one is
    /// malformed, or a retention or detection setting is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env_name = env::var("APP_ENV").ok();
        let app_env = match env_name.as_deref() {
            Some(raw) => Environment::parse(raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw.to_string()))?,
            None => default_env(),
        };

        let retention = RetentionConfig {
            days_to_keep: parse_var("RETENTION_DAYS_TO_KEEP")?.unwrap_or_else(default_days_to_keep),
            sweep_interval_secs: parse_var("RETENTION_SWEEP_INTERVAL_SECS")?
                .unwrap_or_else(default_sweep_interval),
        };
        retention.validate()?;

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: app_env,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            retention,
            security: DetectionThresholds::from_env()?,
        })
    }
}

/// Read an optional variable, failing only when it is present but unparsable
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    parse_value(name, env::var(name).ok())
}

pub(crate) fn parse_value<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
