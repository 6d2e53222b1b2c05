//! Domain rules of the pipeline.
//!
//! Phone column selection and phone number normalization. Both are pure
//! functions over [`Row`](crate::models::Row) values.

pub mod column;
pub mod phone;

pub use column::{resolve_header, resolve_header_in, ColumnLookup, ColumnSelector};
pub use phone::{Normalized, PhoneNormalizer, StripMode, COUNTRY_PREFIX};
