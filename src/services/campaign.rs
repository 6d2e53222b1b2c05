//! End-to-end SMS campaign over one CSV file.

use super::Dispatcher;
use crate::domain::{resolve_header_in, ColumnLookup, ColumnSelector, PhoneNormalizer, StripMode};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{DispatchReport, RowSet};
use crate::reader::CsvReader;
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;

/// What to send, and to whom.
#[derive(Debug, Clone)]
pub struct CampaignRequest {
    /// CSV file with a header row
    pub csv_path: PathBuf,

    /// Provider-valid sender number
    pub from: String,

    /// Message body
    pub body: String,
}

/// How the phone column is found and normalized.
#[derive(Debug, Clone, Default)]
pub struct CampaignOptions {
    pub selector: ColumnSelector,
    pub lookup: ColumnLookup,
    pub strip_mode: StripMode,
}

/// Summary of one campaign run.
#[derive(Debug, Clone)]
pub struct CampaignReport {
    /// Data rows read from the CSV file
    pub rows_parsed: usize,

    /// Header used as the phone column
    pub column: String,

    /// Rows skipped because the phone cell was empty
    pub dropped_empty: usize,

    /// Positions of rows that had no phone cell at all
    pub absent: Vec<usize>,

    pub dispatch: DispatchReport,
}

impl CampaignReport {
    fn empty(column: String) -> Self {
        Self {
            rows_parsed: 0,
            column,
            dropped_empty: 0,
            absent: Vec::new(),
            dispatch: DispatchReport {
                outcomes: Vec::new(),
                started_at: Utc::now(),
                elapsed: Duration::ZERO,
            },
        }
    }
}

/// Read, resolve, normalize, dispatch.
///
/// Reading and column resolution errors abort the run before any message
/// is sent; send errors are recorded per row in the report.
pub struct SmsCampaign {
    reader: CsvReader,
    normalizer: PhoneNormalizer,
    dispatcher: Dispatcher,
    options: CampaignOptions,
}

impl SmsCampaign {
    pub fn new(dispatcher: Dispatcher, options: CampaignOptions) -> Self {
        Self {
            reader: CsvReader::new(),
            normalizer: PhoneNormalizer::new(options.strip_mode),
            dispatcher,
            options,
        }
    }

    pub async fn run(&self, request: &CampaignRequest) -> PipelineResult<CampaignReport> {
        let rows = self.read_rows(request).await?;

        // A bad selector is fatal even when there is nothing to send
        let column = resolve_header_in(&rows.headers, &self.options.selector, self.options.lookup)?;

        if rows.is_empty() {
            tracing::warn!("{} has no data rows, nothing to send", request.csv_path.display());
            return Ok(CampaignReport::empty(column));
        }

        let rows_parsed = rows.len();
        tracing::info!("Using '{}' as the phone column", column);

        let normalized = self.normalizer.normalize(rows.rows, &column);
        if !normalized.absent.is_empty() {
            tracing::warn!(
                "{} rows have no '{}' column and were skipped",
                normalized.absent.len(),
                column
            );
        }

        let dispatch = self
            .dispatcher
            .dispatch(&normalized.rows, &column, &request.from, &request.body)
            .await;

        Ok(CampaignReport {
            rows_parsed,
            column,
            dropped_empty: normalized.dropped_empty,
            absent: normalized.absent,
            dispatch,
        })
    }

    /// Parse the CSV file off the async runtime.
    async fn read_rows(&self, request: &CampaignRequest) -> PipelineResult<RowSet> {
        let reader = self.reader;
        let path = request.csv_path.clone();

        tokio::task::spawn_blocking(move || reader.read(&path))
            .await
            .map_err(|e| PipelineError::Io {
                path: request.csv_path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })?
    }
}
