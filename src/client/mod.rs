//! HTTP client for the Twilio Messages API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles basic authentication and maps
//! Twilio error responses onto [`ProviderApiError`].

mod async_wrapper;
pub use async_wrapper::{AsyncTwilioClient, MessagingProvider};

use crate::config::{Config, ProviderCredentials};
use crate::error::{ProviderApiError, ProviderApiResult};
use crate::metrics::Metrics;
use crate::models::{MessageReceipt, OutboundMessage};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Twilio REST API version segment.
const API_VERSION: &str = "2010-04-01";

/// Error document returned by Twilio on 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<u32>,
    message: Option<String>,
}

/// HTTP client for the Twilio Messages API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct TwilioClient {
    /// Base URL for the Twilio API
    base_url: String,

    /// Account SID, also the first half of the basic auth pair
    account_sid: String,

    /// Precomputed `Authorization` header value
    auth_header: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl TwilioClient {
    /// Create a new TwilioClient from configuration and credentials.
    pub fn new(config: &Config, credentials: &ProviderCredentials) -> Self {
        Self::build(
            config.twilio_api_url.clone(),
            credentials,
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Create a TwilioClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, credentials: &ProviderCredentials) -> Self {
        Self::build(base_url, credentials, Duration::from_secs(10))
    }

    fn build(base_url: String, credentials: &ProviderCredentials, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let token = STANDARD.encode(format!(
            "{}:{}",
            credentials.account_sid, credentials.auth_token
        ));

        Self {
            base_url,
            account_sid: credentials.account_sid.clone(),
            auth_header: format!("Basic {}", token),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn messages_path(&self) -> String {
        format!(
            "/{}/Accounts/{}/Messages.json",
            API_VERSION,
            urlencoding::encode(&self.account_sid)
        )
    }

    /// Execute a form-encoded POST request with authentication.
    fn post_form(&self, path: &str, form: &[(&str, &str)]) -> ProviderApiResult<ureq::Response> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .send_form(form)
            .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        match &result {
            Ok(response) => {
                tracing::debug!("POST {} - Success (status: {})", url, response.status());
            }
            Err(e) => {
                tracing::debug!("POST {} - Error: {:?}", url, e);
                self.metrics.record_http_error();
            }
        }
        self.metrics.record_http_request(duration);

        result
    }

    /// Map a ureq error to a ProviderApiError.
    fn map_error(&self, error: ureq::Error) -> ProviderApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let raw = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let parsed = serde_json::from_str::<TwilioErrorBody>(&raw).ok();
                let message = parsed
                    .as_ref()
                    .and_then(|b| b.message.clone())
                    .unwrap_or_else(|| raw.clone());

                match code {
                    401 => ProviderApiError::Unauthorized,
                    404 => ProviderApiError::NotFound(message),
                    429 => ProviderApiError::RateLimitExceeded,
                    _ => ProviderApiError::ApiError {
                        status: code,
                        code: parsed.and_then(|b| b.code),
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    ProviderApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    ProviderApiError::Timeout
                } else {
                    ProviderApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Create one outbound SMS.
    ///
    /// Returns the provider's message resource; its `sid` identifies the message.
    pub fn send_message(&self, message: &OutboundMessage) -> ProviderApiResult<MessageReceipt> {
        if message.to.is_empty() {
            self.metrics.record_message_failed();
            return Err(ProviderApiError::InvalidRequest(
                "destination number is empty".to_string(),
            ));
        }

        let path = self.messages_path();
        let form = [
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];

        let result = self.post_form(&path, &form).and_then(|response| {
            let body = response
                .into_string()
                .map_err(|e| ProviderApiError::HttpError(e.to_string()))?;
            let receipt: MessageReceipt =
                serde_json::from_str(&body).map_err(ProviderApiError::JsonError)?;
            if receipt.sid.is_empty() {
                return Err(ProviderApiError::Other(
                    "response did not include a message sid".to_string(),
                ));
            }
            Ok(receipt)
        });

        match &result {
            Ok(_) => self.metrics.record_message_sent(),
            Err(_) => self.metrics.record_message_failed(),
        }
        result
    }
}
