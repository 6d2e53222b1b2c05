//! Configuration management for the CSV SMS sender.
//!
//! Credentials, sender number and message body arrive as explicit arguments.
//! Only the tunables below may come from environment variables (or a `.env`
//! file), and only the binary reads them; the pipeline itself takes a `Config`.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::fmt;

/// Default Twilio REST API endpoint.
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";

/// Twilio account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// Account SID (`AC...`)
    pub account_sid: String,

    /// Auth token paired with the account SID
    pub auth_token: String,
}

impl ProviderCredentials {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }

    /// Reject blank credentials before any request is made.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.account_sid.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "twilio-sid".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        if self.auth_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "twilio-auth".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

// Keep the token out of logs.
impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Runtime tunables for the sender.
#[derive(Debug, Clone)]
pub struct Config {
    /// Twilio API base URL
    pub twilio_api_url: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Maximum number of sends in flight at once (default: 10)
    pub max_concurrent_sends: usize,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `TWILIO_API_BASE_URL`: Base URL for the Twilio API (default: https://api.twilio.com)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `MAX_CONCURRENT_SENDS`: Sends in flight at once (default: 10)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env if present; a missing file is fine
        let _ = dotenvy::dotenv();

        let twilio_api_url =
            env::var("TWILIO_API_BASE_URL").unwrap_or_else(|_| DEFAULT_TWILIO_API_URL.to_string());

        if !twilio_api_url.starts_with("http://") && !twilio_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "TWILIO_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let max_concurrent_sends = Self::parse_env_usize("MAX_CONCURRENT_SENDS", 10)?;

        if max_concurrent_sends == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_CONCURRENT_SENDS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            twilio_api_url,
            request_timeout,
            max_concurrent_sends,
            log_level,
        })
    }

    /// Override the concurrency bound, rejecting zero.
    pub fn with_max_concurrent_sends(mut self, max: usize) -> ConfigResult<Self> {
        if max == 0 {
            return Err(ConfigError::InvalidValue {
                var: "concurrency".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }
        self.max_concurrent_sends = max;
        Ok(self)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            twilio_api_url: DEFAULT_TWILIO_API_URL.to_string(),
            request_timeout: 10,
            max_concurrent_sends: 10,
            log_level: "info".to_string(),
        }
    }
}
