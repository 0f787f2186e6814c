//! Client configuration.

use std::{env, time::Duration};

use crate::error::NedError;

/// Root of the public NED API.
pub const DEFAULT_BASE_URL: &str = "https://api.ned.nl/v1";

/// Per-request timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_VAR: &str = "NED_API_KEY";
pub const TIMEOUT_VAR: &str = "NED_REQUEST_TIMEOUT_SECS";
pub const BASE_URL_VAR: &str = "NED_BASE_URL";

/// Settings shared by every request a client issues.
///
/// An empty `api_key` is accepted here; it is rejected per request with an
/// authentication error so that no request ever reaches the network without
/// credentials.
#[derive(Clone)]
pub struct NedConfig {
    pub api_key: String,
    pub request_timeout: Duration,
    pub base_url: String,
}

impl NedConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            request_timeout: DEFAULT_TIMEOUT,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the configuration from the process environment, loading a `.env`
    /// file first when one is present.
    ///
    /// `NED_API_KEY` is required. `NED_REQUEST_TIMEOUT_SECS` and
    /// `NED_BASE_URL` are optional.
    pub fn from_env() -> Result<Self, NedError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .ok_or_else(|| NedError::Authentication(format!("{API_KEY_VAR} is not set")))?;

        let mut config = Self::new(api_key);

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: f64 = raw
                .trim()
                .parse()
                .map_err(|_| NedError::Config(format!("{TIMEOUT_VAR} is not a number: {raw}")))?;
            config.request_timeout = Duration::try_from_secs_f64(secs)
                .map_err(|_| NedError::Config(format!("{TIMEOUT_VAR} is out of range: {raw}")))?;
        }

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = base_url;
        }

        Ok(config)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for NedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NedConfig")
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<empty>" })
            .field("request_timeout", &self.request_timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}
