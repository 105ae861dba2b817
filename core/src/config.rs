// Client configuration

use std::time::Duration;

use crate::progress::StageThresholds;
use crate::symptoms::DEFAULT_MAX_SYMPTOMS;
use crate::validation::ImageConstraints;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_MB: u32 = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Settings consumed by the API client and the UI
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without trailing slash
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub max_upload_mb: u32,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub max_symptoms: usize,
    pub stage_thresholds: StageThresholds,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            max_symptoms: DEFAULT_MAX_SYMPTOMS,
            stage_thresholds: StageThresholds::default(),
        }
    }
}

impl ClientConfig {
    /// Read `API_BASE_URL`, `API_TIMEOUT_SECS`, `MAX_UPLOAD_MB`,
    /// `API_MAX_RETRIES` and `API_RETRY_BASE_DELAY_MS`.
    ///
    /// Runtime environment wins over values baked in at build time; unset
    /// or malformed values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| baked(key)))
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let api_base_url = lookup("API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        Self {
            api_base_url,
            request_timeout: parse("API_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_upload_mb: parse("MAX_UPLOAD_MB")
                .and_then(|mb| u32::try_from(mb).ok())
                .filter(|mb| *mb > 0)
                .unwrap_or(defaults.max_upload_mb),
            max_retries: parse("API_MAX_RETRIES")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.max_retries),
            retry_base_delay: parse("API_RETRY_BASE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            ..defaults
        }
    }

    pub fn image_constraints(&self) -> ImageConstraints {
        ImageConstraints::new(self.max_upload_mb)
    }

    /// Absolute URL of an API endpoint, e.g. `endpoint("/predict")`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

/// Values fixed at compile time (the only source available in the browser)
fn baked(key: &str) -> Option<String> {
    let value = match key {
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "API_TIMEOUT_SECS" => option_env!("API_TIMEOUT_SECS"),
        "MAX_UPLOAD_MB" => option_env!("MAX_UPLOAD_MB"),
        "API_MAX_RETRIES" => option_env!("API_MAX_RETRIES"),
        "API_RETRY_BASE_DELAY_MS" => option_env!("API_RETRY_BASE_DELAY_MS"),
        _ => None,
    };
    value.map(str::to_string)
}
