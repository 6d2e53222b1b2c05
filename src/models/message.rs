//! Outbound message, provider receipt and dispatch outcome models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One SMS to hand to the messaging provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Destination number (normalized)
    pub to: String,

    /// Provider-valid sender number
    pub from: String,

    /// Message text
    pub body: String,
}

/// Message resource returned by the Twilio Messages API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct MessageReceipt {
    /// Provider-assigned message identifier (`SM...`)
    pub sid: String,

    /// Delivery status at creation time (usually "queued")
    pub status: Option<String>,

    /// Destination as echoed by the provider
    pub to: Option<String>,

    /// RFC 2822 creation timestamp
    pub date_created: Option<String>,
}

/// The result of sending one normalized row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent {
        position: usize,
        to: String,
        message_id: String,
    },
    Failed {
        position: usize,
        to: String,
        error: String,
    },
}

impl SendOutcome {
    /// Position of the source row among the CSV data rows.
    pub fn position(&self) -> usize {
        match self {
            SendOutcome::Sent { position, .. } | SendOutcome::Failed { position, .. } => *position,
        }
    }

    pub fn to(&self) -> &str {
        match self {
            SendOutcome::Sent { to, .. } | SendOutcome::Failed { to, .. } => to,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

/// Every per-row outcome of one dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Outcomes sorted by row position
    pub outcomes: Vec<SendOutcome>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.sent_count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}
