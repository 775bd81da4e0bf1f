use std::time::Duration;

use thiserror::Error;
use upload_flow::{HttpAnalysisService, TransportError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const BASE_URL_VAR: &str = "MEDSCAN_BASE_URL";
pub const TIMEOUT_VAR: &str = "MEDSCAN_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MEDSCAN_BASE_URL must be an http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),

    #[error("MEDSCAN_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

/// Where the analysis service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = validate_base_url(base_url.trim())?;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(base_url) = base_url {
            self.base_url = validate_base_url(base_url.trim())?;
        }
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(secs.to_string()));
            }
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    pub fn build_service(&self) -> Result<HttpAnalysisService, TransportError> {
        HttpAnalysisService::new(&self.base_url, self.timeout)
    }
}

fn validate_base_url(base_url: &str) -> Result<String, ConfigError> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(base_url.to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl(base_url.to_string()))
    }
}
