//! CSV SMS Sender - Main entry point
//!
//! Reads phone numbers from a CSV file and sends every recipient the same SMS
//! through Twilio.

use anyhow::{Context, Result};
use clap::Parser;
use csv_sms_sender::{
    AsyncTwilioClient, CampaignOptions, CampaignRequest, ColumnLookup, ColumnSelector, Config,
    Dispatcher, MessagingProvider, ProviderCredentials, SendOutcome, SmsCampaign, StripMode,
    TwilioClient,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csv-sms-sender")]
#[command(about = "Send SMS from CSV file", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV path of phone numbers
    csv_file: PathBuf,

    /// Twilio account SID
    twilio_sid: String,

    /// Twilio auth token
    twilio_auth: String,

    /// Valid Twilio phone number to send from
    twilio_from: String,

    /// SMS message body to send
    message: String,

    /// Zero-based index of the phone column (default: 0)
    #[arg(short = 'c', long = "col", value_name = "INDEX", conflicts_with = "col_name")]
    col: Option<usize>,

    /// Header name of the phone column
    #[arg(short = 'n', long = "col-name", value_name = "NAME")]
    col_name: Option<String>,

    /// Remove every hyphen and space instead of only the first of each,
    /// and leave numbers that already start with '+' untouched
    #[arg(long, default_value_t = false)]
    strip_all: bool,

    /// Fail when --col-name is not in the header row
    #[arg(long, default_value_t = false)]
    strict_columns: bool,

    /// Maximum number of sends in flight at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Exit with an error status if any message failed to send
    #[arg(long, default_value_t = false)]
    fail_on_send_error: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(concurrency) = cli.concurrency {
        config = config.with_max_concurrent_sends(concurrency)?;
    }

    // Logging goes to stderr; RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let credentials = ProviderCredentials::new(cli.twilio_sid, cli.twilio_auth);
    credentials.validate()?;

    let options = CampaignOptions {
        selector: ColumnSelector::from_options(cli.col, cli.col_name)?,
        lookup: if cli.strict_columns {
            ColumnLookup::Strict
        } else {
            ColumnLookup::Lenient
        },
        strip_mode: if cli.strip_all {
            StripMode::All
        } else {
            StripMode::FirstOccurrence
        },
    };

    info!("Sending through {}", config.twilio_api_url);

    let client = AsyncTwilioClient::new(TwilioClient::new(&config, &credentials));
    let provider = Arc::new(client.clone()) as Arc<dyn MessagingProvider>;
    let dispatcher = Dispatcher::new(provider).with_max_concurrent(config.max_concurrent_sends);
    let campaign = SmsCampaign::new(dispatcher, options);

    let request = CampaignRequest {
        csv_path: cli.csv_file,
        from: cli.twilio_from,
        body: cli.message,
    };

    // Stage errors are reported once, by anyhow on return from main
    let report = campaign.run(&request).await?;

    for outcome in &report.dispatch.outcomes {
        if let SendOutcome::Failed { position, to, error } = outcome {
            warn!("Row {} ({}) failed: {}", position, to, error);
        }
    }

    let summary = client.metrics().summary();
    info!(
        "Done: {} rows parsed, {} empty, {} without phone column, {} sent, {} failed (avg request {:.0}ms)",
        report.rows_parsed,
        report.dropped_empty,
        report.absent.len(),
        report.dispatch.sent_count(),
        report.dispatch.failed_count(),
        summary.http_duration_avg_ms
    );

    if cli.fail_on_send_error && report.dispatch.has_failures() {
        anyhow::bail!(
            "{} of {} messages failed to send",
            report.dispatch.failed_count(),
            report.dispatch.outcomes.len()
        );
    }

    Ok(())
}
