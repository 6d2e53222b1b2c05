//! CSV row model.

use std::sync::Arc;

/// One parsed CSV record as a header to value mapping.
///
/// All rows of one file share the same header list, which keeps the header
/// order of the source line. A record shorter than the header line leaves
/// the trailing headers absent: `get` returns `None` for them, which is
/// different from an empty cell (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Zero-based position of the record among the data rows
    position: usize,

    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Build a row from a shared header list and the record's values.
    ///
    /// Values beyond the header count are ignored; callers reject such
    /// records before they get here.
    pub fn new(position: usize, headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.truncate(headers.len());
        Self {
            position,
            headers,
            values,
        }
    }

    /// Convenience constructor from `(header, value)` pairs, mostly for tests.
    pub fn from_pairs<K, V>(position: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (headers, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(position, headers.into(), values)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Header names in source order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Look up a cell by header name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == key)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Return a copy of this row with one present cell replaced.
    ///
    /// Returns `None` when `key` is absent from the row.
    pub fn with_value(&self, key: &str, value: impl Into<String>) -> Option<Row> {
        let idx = self.headers.iter().position(|h| h == key)?;
        if idx >= self.values.len() {
            return None;
        }
        let mut row = self.clone();
        row.values[idx] = value.into();
        Some(row)
    }

    /// Iterate over the present `(header, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// All data rows of one CSV file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first data row, used to discover the header names.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }
}
