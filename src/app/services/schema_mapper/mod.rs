//! Schema mapping for heterogeneous ANS statement files
//!
//! The quarterly statement files vary across vintages: delimiters differ,
//! columns are renamed, preamble metadata precedes the header row, and
//! decimal amounts use Brazilian separators. This module locates the data
//! rows and maps them onto [`CanonicalRecord`](crate::app::models::CanonicalRecord):
//!
//! - [`delimiter`] - cell delimiter detection over a leading sample
//! - [`header`] - header-row location and alias-based column binding
//! - [`field_parsers`] - decimal separator normalization and period
//!   extraction from columns or filename
//! - [`mapper`] - single-pass orchestration per file
//! - [`stats`] - row-level skip metrics
//!
//! Unmappable rows are dropped and counted, never fatal; a file with no
//! detectable header row fails mapping at file level and is skipped.

pub mod delimiter;
pub mod field_parsers;
pub mod header;
pub mod mapper;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use header::ColumnBindings;
pub use mapper::SchemaMapper;
pub use stats::{MapResult, MapStats};
