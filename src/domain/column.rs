//! Phone column selection.

use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::models::Row;

/// Which CSV column holds the phone numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Header name, used as given
    ByName(String),

    /// Zero-based position in the header row
    ByIndex(usize),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::ByIndex(0)
    }
}

impl ColumnSelector {
    /// Build a selector from the two mutually exclusive CLI options.
    ///
    /// Neither given selects the first column.
    pub fn from_options(index: Option<usize>, name: Option<String>) -> PipelineResult<Self> {
        match (index, name) {
            (Some(_), Some(_)) => Err(ConfigError::Other(
                "--col and --col-name cannot be used together".to_string(),
            )
            .into()),
            (_, Some(name)) => Ok(ColumnSelector::ByName(name)),
            (Some(index), None) => Ok(ColumnSelector::ByIndex(index)),
            (None, None) => Ok(ColumnSelector::default()),
        }
    }
}

/// How a `ByName` selector is checked against the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnLookup {
    /// Take the name as-is; rows without it surface as absent later on
    #[default]
    Lenient,

    /// The name must appear in the header row
    Strict,
}

/// Determine the header that designates the phone column.
///
/// `ByIndex` picks the header at that position in source order. `ByName`
/// is returned unchanged unless `lookup` is [`ColumnLookup::Strict`].
///
/// # Errors
///
/// - `PipelineError::NoRows` when there is no first row
/// - `PipelineError::ColumnOutOfRange` when the index is past the last header
/// - `PipelineError::ColumnNotFound` for an unknown name in strict mode
pub fn resolve_header(
    first_row: Option<&Row>,
    selector: &ColumnSelector,
    lookup: ColumnLookup,
) -> PipelineResult<String> {
    let row = first_row.ok_or(PipelineError::NoRows)?;
    resolve_header_in(row.headers(), selector, lookup)
}

/// Same as [`resolve_header`], checked against a bare header row.
///
/// Lets a header-only file still reject a bad selector.
pub fn resolve_header_in(
    headers: &[String],
    selector: &ColumnSelector,
    lookup: ColumnLookup,
) -> PipelineResult<String> {
    let key = match selector {
        ColumnSelector::ByName(name) => {
            if lookup == ColumnLookup::Strict && !headers.iter().any(|h| h == name) {
                return Err(PipelineError::ColumnNotFound(name.clone()));
            }
            name.clone()
        }
        ColumnSelector::ByIndex(index) => {
            headers
                .get(*index)
                .cloned()
                .ok_or(PipelineError::ColumnOutOfRange {
                    index: *index,
                    available: headers.len(),
                })?
        }
    };

    tracing::debug!("Resolved phone column '{}' from {:?}", key, selector);
    Ok(key)
}
