//! Async wrapper around the synchronous TwilioClient.
//!
//! This module provides an async interface to the synchronous TwilioClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::TwilioClient;
use crate::error::{ProviderApiError, ProviderApiResult};
use crate::metrics::Metrics;
use crate::models::{MessageReceipt, OutboundMessage};
use async_trait::async_trait;
use std::sync::Arc;

/// A service able to deliver one SMS.
///
/// The dispatcher only depends on this trait, so tests can substitute an
/// in-memory provider for the real HTTP client.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> ProviderApiResult<MessageReceipt>;
}

/// Async wrapper around synchronous TwilioClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncTwilioClient {
    client: Arc<TwilioClient>,
}

impl AsyncTwilioClient {
    pub fn new(client: TwilioClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        self.client.metrics()
    }
}

#[async_trait]
impl MessagingProvider for AsyncTwilioClient {
    async fn send(&self, message: &OutboundMessage) -> ProviderApiResult<MessageReceipt> {
        let client = self.client.clone();
        let message = message.clone();

        tokio::task::spawn_blocking(move || client.send_message(&message))
            .await
            .map_err(|e| ProviderApiError::HttpError(format!("Task join error: {}", e)))?
    }
}
