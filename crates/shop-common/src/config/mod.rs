//! Configuration structs

mod app_config;
mod detection;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, RetentionConfig,
    MAX_DAYS_TO_KEEP,
};
pub use detection::DetectionThresholds;
