//! Detector thresholds
//!
//! Defaults reproduce the production heuristics; every value can be
//! overridden through `SECURITY_*` environment variables. A set but
//! malformed or out-of-range value fails the load.

use std::env;

use super::app_config::{parse_value, ConfigError};

/// Longest scan window accepted for minute- and hour-based settings
const MAX_WINDOW_HOURS: i64 = 24 * 366;

/// Longest look-back accepted for day-based settings
const MAX_LOOKBACK_DAYS: i64 = 3660;

/// Windows and thresholds used by the security-alert detectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionThresholds {
    /// Failed-login scan window
    pub failed_login_window_minutes: i64,
    /// Failed attempts per user that raise an alert
    pub failed_login_threshold: i64,
    /// Failed attempts per user that raise the alert to HIGH
    pub failed_login_high_threshold: i64,

    /// Logins younger than this are compared against history
    pub location_recent_hours: i64,
    /// How far back the country history reaches
    pub location_history_days: i64,

    pub account_creation_window_minutes: i64,
    /// Distinct accounts per IP that raise an alert
    pub account_creation_threshold: i64,
    /// Distinct accounts per IP that raise the alert to HIGH
    pub account_creation_high_threshold: i64,

    pub high_value_window_hours: i64,
    /// Minimum order total, in minor currency units
    pub high_value_min_total: i64,
    /// Accounts at most this old are considered new
    pub high_value_max_account_age_days: i64,

    pub rapid_orders_window_minutes: i64,
    /// Orders per user inside the window that raise an alert
    pub rapid_orders_threshold: i64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            failed_login_window_minutes: 10,
            failed_login_threshold: 5,
            failed_login_high_threshold: 10,
            location_recent_hours: 24,
            location_history_days: 90,
            account_creation_window_minutes: 60,
            account_creation_threshold: 3,
            account_creation_high_threshold: 5,
            high_value_window_hours: 24,
            high_value_min_total: 50_000,
            high_value_max_account_age_days: 7,
            rapid_orders_window_minutes: 5,
            rapid_orders_threshold: 3,
        }
    }
}

impl DetectionThresholds {
    /// Load overrides from `SECURITY_*` environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set but not an integer, or a value is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load overrides through `lookup`, keeping defaults for unset names
    ///
    /// # Errors
    /// Same as [`DetectionThresholds::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &'static str, default: i64| -> Result<i64, ConfigError> {
            Ok(parse_value(name, lookup(name))?.unwrap_or(default))
        };

        let thresholds = Self {
            failed_login_window_minutes: var(
                "SECURITY_FAILED_LOGIN_WINDOW_MINUTES",
                defaults.failed_login_window_minutes,
            )?,
            failed_login_threshold: var(
                "SECURITY_FAILED_LOGIN_THRESHOLD",
                defaults.failed_login_threshold,
            )?,
            failed_login_high_threshold: var(
                "SECURITY_FAILED_LOGIN_HIGH_THRESHOLD",
                defaults.failed_login_high_threshold,
            )?,
            location_recent_hours: var(
                "SECURITY_LOCATION_RECENT_HOURS",
                defaults.location_recent_hours,
            )?,
            location_history_days: var(
                "SECURITY_LOCATION_HISTORY_DAYS",
                defaults.location_history_days,
            )?,
            account_creation_window_minutes: var(
                "SECURITY_RAPID_ACCOUNT_WINDOW_MINUTES",
                defaults.account_creation_window_minutes,
            )?,
            account_creation_threshold: var(
                "SECURITY_RAPID_ACCOUNT_THRESHOLD",
                defaults.account_creation_threshold,
            )?,
            account_creation_high_threshold: var(
                "SECURITY_RAPID_ACCOUNT_HIGH_THRESHOLD",
                defaults.account_creation_high_threshold,
            )?,
            high_value_window_hours: var(
                "SECURITY_HIGH_VALUE_WINDOW_HOURS",
                defaults.high_value_window_hours,
            )?,
            high_value_min_total: var(
                "SECURITY_HIGH_VALUE_MIN_TOTAL",
                defaults.high_value_min_total,
            )?,
            high_value_max_account_age_days: var(
                "SECURITY_HIGH_VALUE_MAX_ACCOUNT_AGE_DAYS",
                defaults.high_value_max_account_age_days,
            )?,
            rapid_orders_window_minutes: var(
                "SECURITY_RAPID_ORDERS_WINDOW_MINUTES",
                defaults.rapid_orders_window_minutes,
            )?,
            rapid_orders_threshold: var(
                "SECURITY_RAPID_ORDERS_THRESHOLD",
                defaults.rapid_orders_threshold,
            )?,
        };

        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Reject windows that are empty or too long to subtract from a timestamp,
    /// and thresholds that could never fire
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending variable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_minutes = MAX_WINDOW_HOURS * 60;
        check("SECURITY_FAILED_LOGIN_WINDOW_MINUTES", self.failed_login_window_minutes, 1, max_minutes)?;
        check("SECURITY_FAILED_LOGIN_THRESHOLD", self.failed_login_threshold, 1, i64::MAX)?;
        check(
            "SECURITY_FAILED_LOGIN_HIGH_THRESHOLD",
            self.failed_login_high_threshold,
            self.failed_login_threshold,
            i64::MAX,
        )?;
        check("SECURITY_LOCATION_RECENT_HOURS", self.location_recent_hours, 1, MAX_WINDOW_HOURS)?;
        check("SECURITY_LOCATION_HISTORY_DAYS", self.location_history_days, 1, MAX_LOOKBACK_DAYS)?;
        check(
            "SECURITY_RAPID_ACCOUNT_WINDOW_MINUTES",
            self.account_creation_window_minutes,
            1,
            max_minutes,
        )?;
        check("SECURITY_RAPID_ACCOUNT_THRESHOLD", self.account_creation_threshold, 1, i64::MAX)?;
        check(
            "SECURITY_RAPID_ACCOUNT_HIGH_THRESHOLD",
            self.account_creation_high_threshold,
            self.account_creation_threshold,
            i64::MAX,
        )?;
        check("SECURITY_HIGH_VALUE_WINDOW_HOURS", self.high_value_window_hours, 1, MAX_WINDOW_HOURS)?;
        check("SECURITY_HIGH_VALUE_MIN_TOTAL", self.high_value_min_total, 0, i64::MAX)?;
        check(
            "SECURITY_HIGH_VALUE_MAX_ACCOUNT_AGE_DAYS",
            self.high_value_max_account_age_days,
            0,
            MAX_LOOKBACK_DAYS,
        )?;
        check("SECURITY_RAPID_ORDERS_WINDOW_MINUTES", self.rapid_orders_window_minutes, 1, max_minutes)?;
        check("SECURITY_RAPID_ORDERS_THRESHOLD", self.rapid_orders_threshold, 1, i64::MAX)?;
        Ok(())
    }
}

fn check(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(name, value.to_string()))
    }
}
