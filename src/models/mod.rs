//! Data models for the SMS pipeline.
//!
//! Rows parsed from the CSV input, the messages built from them, and the
//! per-row outcomes reported by the dispatcher.

pub mod message;
pub mod row;

pub use message::{DispatchReport, MessageReceipt, OutboundMessage, SendOutcome};
pub use row::{Row, RowSet};
