//! Per-row message dispatch.

use crate::client::MessagingProvider;
use crate::models::{DispatchReport, OutboundMessage, Row, SendOutcome};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Default number of sends kept in flight at once.
pub const DEFAULT_MAX_CONCURRENT_SENDS: usize = 10;

/// Sends one message per normalized row through an injected provider.
///
/// Sends run concurrently up to `max_concurrent` and `dispatch` resolves
/// only after every row has an outcome. A failed send is recorded for its
/// row and never stops the remaining sends.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn MessagingProvider>,
    max_concurrent: usize,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn MessagingProvider>) -> Self {
        Self {
            provider,
            max_concurrent: DEFAULT_MAX_CONCURRENT_SENDS,
        }
    }

    /// Set the concurrency bound (values below 1 are treated as 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Send `body` from `from` to the `key` cell of every row.
    pub async fn dispatch(&self, rows: &[Row], key: &str, from: &str, body: &str) -> DispatchReport {
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            "Dispatching {} messages (max {} in flight)",
            rows.len(),
            self.max_concurrent
        );

        let mut outcomes: Vec<SendOutcome> = stream::iter(rows)
            .map(|row| self.send_row(row, key, from, body))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        outcomes.sort_by_key(SendOutcome::position);

        let report = DispatchReport {
            outcomes,
            started_at,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Dispatch finished in {}ms: {} sent, {} failed",
            report.elapsed.as_millis(),
            report.sent_count(),
            report.failed_count()
        );

        report
    }

    async fn send_row(&self, row: &Row, key: &str, from: &str, body: &str) -> SendOutcome {
        let position = row.position();

        let Some(to) = row.get(key) else {
            tracing::error!("Row {} has no '{}' column, not sent", position, key);
            return SendOutcome::Failed {
                position,
                to: String::new(),
                error: format!("row has no '{}' column", key),
            };
        };

        let message = OutboundMessage {
            to: to.to_string(),
            from: from.to_string(),
            body: body.to_string(),
        };

        match self.provider.send(&message).await {
            Ok(receipt) => {
                tracing::info!("SENT to {} - messageID: {}", message.to, receipt.sid);
                SendOutcome::Sent {
                    position,
                    to: message.to,
                    message_id: receipt.sid,
                }
            }
            Err(e) => {
                tracing::error!("Failed to send to {}: {}", message.to, e);
                SendOutcome::Failed {
                    position,
                    to: message.to,
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderApiError, ProviderApiResult};
    use crate::models::MessageReceipt;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails for one destination, succeeds for the rest.
    struct FlakyProvider {
        failing_to: String,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl MessagingProvider for FlakyProvider {
        async fn send(&self, message: &OutboundMessage) -> ProviderApiResult<MessageReceipt> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if message.to == self.failing_to {
                return Err(ProviderApiError::ApiError {
                    status: 400,
                    code: Some(21211),
                    message: "Invalid 'To' Phone Number".to_string(),
                });
            }
            Ok(MessageReceipt {
                sid: format!("SM{}", message.to.trim_start_matches('+')),
                ..Default::default()
            })
        }
    }

    fn provider(failing_to: &str) -> Arc<FlakyProvider> {
        Arc::new(FlakyProvider {
            failing_to: failing_to.to_string(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    fn rows(phones: &[&str]) -> Vec<Row> {
        phones
            .iter()
            .enumerate()
            .map(|(i, p)| Row::from_pairs(i, [("phone", *p)]))
            .collect()
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_rows() {
        let provider = provider("+9722");
        let dispatcher = Dispatcher::new(provider);
        let report = dispatcher
            .dispatch(&rows(&["+9721", "+9722", "+9723"]), "phone", "+1500", "hi")
            .await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.sent_count(), 2);
        assert_eq!(report.failed_count(), 1);

        let positions: Vec<usize> = report.outcomes.iter().map(|o| o.position()).collect();
        assert_eq!(positions, vec![0, 1, 2]);

        match &report.outcomes[1] {
            SendOutcome::Failed { to, error, .. } => {
                assert_eq!(to, "+9722");
                assert!(error.contains("21211"));
            }
            other => panic!("Expected failure, got: {:?}", other),
        }
        assert_eq!(
            report.outcomes[0],
            SendOutcome::Sent {
                position: 0,
                to: "+9721".to_string(),
                message_id: "SM9721".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let provider = provider("none");
        let dispatcher = Dispatcher::new(provider.clone()).with_max_concurrent(2);
        let phones: Vec<String> = (0..8).map(|i| format!("+972{}", i)).collect();
        let phone_refs: Vec<&str> = phones.iter().map(String::as_str).collect();

        let report = dispatcher
            .dispatch(&rows(&phone_refs), "phone", "+1500", "hi")
            .await;

        assert_eq!(report.sent_count(), 8);
        // Sends overlap up to the bound, never beyond it
        assert_eq!(provider.peak.load(Ordering::SeqCst), 2);
        assert_eq!(provider.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_key_recorded_as_failure() {
        let dispatcher = Dispatcher::new(provider("none"));
        let report = dispatcher
            .dispatch(&rows(&["+9721"]), "mobile", "+1500", "hi")
            .await;
        assert_eq!(report.failed_count(), 1);
        assert!(!report.outcomes[0].is_sent());
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_report() {
        let dispatcher = Dispatcher::new(provider("none"));
        let report = dispatcher.dispatch(&[], "phone", "+1500", "hi").await;
        assert!(report.outcomes.is_empty());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let dispatcher = Dispatcher::new(provider("none")).with_max_concurrent(0);
        assert_eq!(dispatcher.max_concurrent(), 1);
    }
}
