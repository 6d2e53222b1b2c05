use async_trait::async_trait;
use csv_sms_sender::error::{ProviderApiError, ProviderApiResult};
use csv_sms_sender::{MessageReceipt, MessagingProvider, OutboundMessage};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory messaging provider for testing.
///
/// Records every message it receives and fails for destinations registered
/// with `fail_for`.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockMessagingProvider {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    delay: Option<Duration>,
    next_id: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockMessagingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every send before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_for(&self, to: &str) {
        self.failing.lock().unwrap().insert(to.to_string());
    }

    /// Every message received so far, in arrival order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn destinations(&self) -> Vec<String> {
        let mut to: Vec<String> = self.sent().into_iter().map(|m| m.to).collect();
        to.sort();
        to
    }
}

#[async_trait]
impl MessagingProvider for MockMessagingProvider {
    async fn send(&self, message: &OutboundMessage) -> ProviderApiResult<MessageReceipt> {
        self.sent.lock().unwrap().push(message.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&message.to) {
            return Err(ProviderApiError::ApiError {
                status: 400,
                code: Some(21211),
                message: format!("The 'To' number {} is not a valid phone number.", message.to),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(MessageReceipt {
            sid: format!("SM{:032}", id),
            status: Some("queued".to_string()),
            to: Some(message.to.clone()),
            date_created: None,
        })
    }
}
