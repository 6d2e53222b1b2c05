//! Phone number normalization.

use crate::models::Row;

/// Dialing prefix prepended to every phone number.
pub const COUNTRY_PREFIX: &str = "972";

/// How separators are removed from a phone number before prefixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    /// Remove the first hyphen and the first space only.
    ///
    /// `"05-2-1234567"` becomes `"+972052-1234567"`. Prefixing is
    /// unconditional, so normalizing twice yields `"+972+972..."`.
    #[default]
    FirstOccurrence,

    /// Remove every hyphen and space, and leave numbers that already start
    /// with `+` untouched.
    All,
}

/// Output of [`PhoneNormalizer::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Rows with a rewritten phone cell, in input order
    pub rows: Vec<Row>,

    /// Number of rows dropped because the phone cell was empty
    pub dropped_empty: usize,

    /// Positions of rows that have no cell for the phone column
    pub absent: Vec<usize>,
}

/// Rewrites phone cells into `+<country prefix><digits>` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneNormalizer {
    mode: StripMode,
}

impl PhoneNormalizer {
    pub fn new(mode: StripMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> StripMode {
        self.mode
    }

    /// Drop rows with an empty or absent phone cell and normalize the rest.
    pub fn normalize(&self, rows: Vec<Row>, key: &str) -> Normalized {
        let mut out = Normalized::default();

        for row in rows {
            let phone = match row.get(key) {
                None => {
                    tracing::warn!(
                        "Row {} has no '{}' column, skipping",
                        row.position(),
                        key
                    );
                    out.absent.push(row.position());
                    continue;
                }
                Some("") => {
                    out.dropped_empty += 1;
                    continue;
                }
                Some(phone) => self.normalize_number(phone),
            };

            // The key was present above, so the replacement cannot miss
            if let Some(updated) = row.with_value(key, phone) {
                out.rows.push(updated);
            }
        }

        tracing::debug!(
            "Normalized {} rows ({} empty, {} absent)",
            out.rows.len(),
            out.dropped_empty,
            out.absent.len()
        );
        out
    }

    /// Normalize a single non-empty phone value.
    pub fn normalize_number(&self, phone: &str) -> String {
        match self.mode {
            StripMode::FirstOccurrence => {
                let stripped = phone.replacen('-', "", 1).replacen(' ', "", 1);
                format!("+{}{}", COUNTRY_PREFIX, stripped)
            }
            StripMode::All => {
                if phone.starts_with('+') {
                    return phone.to_string();
                }
                let stripped: String = phone.chars().filter(|c| *c != '-' && *c != ' ').collect();
                format!("+{}{}", COUNTRY_PREFIX, stripped)
            }
        }
    }
}
