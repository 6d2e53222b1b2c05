//! CSV SMS Sender - send one SMS to every phone number listed in a CSV file.
//!
//! The library runs a four-stage pipeline: read the CSV file into rows,
//! resolve which column holds the phone numbers, normalize those numbers to
//! `+972...` form, and dispatch one message per row through Twilio.
//!
//! # Architecture
//!
//! - **reader**: CSV ingestion into header-keyed rows
//! - **domain**: phone column selection and phone number normalization
//! - **client**: Twilio Messages API client and the `MessagingProvider` trait
//! - **services**: bounded concurrent dispatch and the end-to-end campaign
//! - **models**: rows, outbound messages and send outcomes
//! - **error**: custom error types for precise error handling
//! - **config**: tunables loaded from environment variables
//! - **metrics**: request and send counters

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod reader;
pub mod services;

pub use client::{AsyncTwilioClient, MessagingProvider, TwilioClient};
pub use config::{Config, ProviderCredentials};
pub use domain::{
    resolve_header, resolve_header_in, ColumnLookup, ColumnSelector, PhoneNormalizer, StripMode,
};
pub use error::{ConfigError, PipelineError, ProviderApiError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{DispatchReport, MessageReceipt, OutboundMessage, Row, RowSet, SendOutcome};
pub use reader::CsvReader;
pub use services::{CampaignOptions, CampaignReport, CampaignRequest, Dispatcher, SmsCampaign};
