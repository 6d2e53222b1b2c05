//! CSV ingestion.
//!
//! Streams a comma-separated file with a header row into a [`RowSet`]. Cell
//! values are kept exactly as written: no trimming, no type coercion.

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Row, RowSet};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Reader for header-plus-records CSV input.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader;

impl CsvReader {
    pub fn new() -> Self {
        Self
    }

    /// Read every data row of the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Io` if the file cannot be opened or read
    /// - `PipelineError::Format` if the content is not valid CSV with a header row
    pub fn read(&self, path: impl AsRef<Path>) -> PipelineResult<RowSet> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file = File::open(path).map_err(|source| PipelineError::Io {
            path: display.clone(),
            source,
        })?;

        self.parse(file, &display)
    }

    /// Read every data row from an arbitrary byte stream.
    pub fn read_from<R: Read>(&self, reader: R) -> PipelineResult<RowSet> {
        self.parse(reader, "<stream>")
    }

    fn parse<R: Read>(&self, reader: R, source: &str) -> PipelineResult<RowSet> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(Trim::None)
            .flexible(true) // short records are allowed, long ones are rejected below
            .from_reader(reader);

        let header_record = reader
            .headers()
            .map_err(|e| Self::map_csv_error(e, source))?
            .clone();
        let headers = Self::validate_headers(&header_record)?;
        let shared: Arc<[String]> = headers.clone().into();

        let mut rows = Vec::new();
        for (position, result) in reader.records().enumerate() {
            let record = result.map_err(|e| Self::map_csv_error(e, source))?;

            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(PipelineError::Format(format!(
                    "column header mismatch on line {}: expected {} columns, got {}",
                    line,
                    headers.len(),
                    record.len()
                )));
            }

            let values = record.iter().map(str::to_string).collect();
            rows.push(Row::new(position, shared.clone(), values));
        }

        tracing::info!("Parsed {} rows", rows.len());

        Ok(RowSet { headers, rows })
    }

    /// Header names must be unique so every row is a proper mapping.
    fn validate_headers(record: &StringRecord) -> PipelineResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for header in record.iter() {
            if !seen.insert(header) && !duplicates.contains(&header) {
                duplicates.push(header);
            }
        }

        if !duplicates.is_empty() {
            return Err(PipelineError::Format(format!(
                "duplicate headers found: {}",
                duplicates.join(", ")
            )));
        }

        Ok(record.iter().map(str::to_string).collect())
    }

    fn map_csv_error(err: csv::Error, source: &str) -> PipelineError {
        tracing::debug!("Failed {}", err);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => PipelineError::Io {
                path: source.to_string(),
                source: io,
            },
            _ => PipelineError::Format(message),
        }
    }
}
