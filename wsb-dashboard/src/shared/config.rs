/// Environment driven configuration
///
/// Every setting has a default so the dashboard runs against a local
/// backend (`uvicorn api:app --port 8000`) with no environment at all.
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::client::ApiConfig;
use crate::shared::error::DashboardError;
use crate::shared::view::Timeframe;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_LIMIT: u32 = 50;
/// Auto refresh every 5 minutes
pub const DEFAULT_REFRESH_SECS: u64 = 5 * 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "wsb-dashboard.log";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub timeframe: Timeframe,
    /// Max tickers requested per refresh
    pub limit: u32,
    pub refresh_interval: Duration,
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            timeframe: Timeframe::default(),
            limit: DEFAULT_LIMIT,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl DashboardConfig {
    /// Read `WSB_*` variables from the process environment
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("WSB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = parse_var(&lookup, "WSB_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let hours = parse_var(&lookup, "WSB_HOURS", Timeframe::default().hours())?;
        let limit = parse_var(&lookup, "WSB_LIMIT", DEFAULT_LIMIT)?;
        let refresh_secs = parse_var(&lookup, "WSB_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;

        let timeframe = Timeframe::from_hours(hours).ok_or_else(|| DashboardError::Config {
            var: "WSB_HOURS",
            value: hours.to_string(),
            reason: "expected 24, 48 or 72".to_string(),
        })?;

        if limit == 0 {
            return Err(DashboardError::Config {
                var: "WSB_LIMIT",
                value: limit.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if refresh_secs == 0 {
            return Err(DashboardError::Config {
                var: "WSB_REFRESH_SECS",
                value: refresh_secs.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if timeout_secs == 0 {
            return Err(DashboardError::Config {
                var: "WSB_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api: ApiConfig::new(api_url).with_timeout(Duration::from_secs(timeout_secs)),
            timeframe,
            limit,
            refresh_interval: Duration::from_secs(refresh_secs),
            log_file: lookup("WSB_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, DashboardError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(error) => Err(DashboardError::Config {
                var,
                reason: error.to_string(),
                value,
            }),
        },
    }
}
