//! Service configuration
//!
//! Loaded once at startup and shared read-only with the handlers.

use std::env;

use crate::calendar::MonthCalendar;
use crate::error::ForecastError;
use crate::Result;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    /// Empty when the analyze endpoint is not configured
    pub gemini_api_key: String,
    pub model_id: String,
    pub gemini_base_url: String,
    pub port: u16,
    /// Fixed anchor for month labels, current month when unset
    pub start_month: Option<MonthCalendar>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            model_id: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            start_month: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (after `.env`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = non_empty("GEMINI_API_KEY").unwrap_or_default();

        let model_id = non_empty("GEMINI_MODEL")
            .map(|m| m.trim().trim_start_matches("models/").to_string())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let gemini_base_url = non_empty("GEMINI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ForecastError::Config(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let start_month = non_empty("FORECAST_START_MONTH")
            .map(|raw| MonthCalendar::parse(&raw))
            .transpose()
            .map_err(|e| ForecastError::Config(format!("FORECAST_START_MONTH: {}", e)))?;

        Ok(Self {
            gemini_api_key,
            model_id,
            gemini_base_url,
            port,
            start_month,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Calendar used when a request does not pin its own start month
    pub fn calendar(&self) -> MonthCalendar {
        self.start_month.unwrap_or_else(MonthCalendar::current)
    }
}
