//! Mapping statistics and per-file result structures

use crate::app::models::CanonicalRecord;

/// Result of mapping one source file
#[derive(Debug, Clone)]
pub struct MapResult {
    /// Canonical records in source order
    pub records: Vec<CanonicalRecord>,

    /// Row-level metrics for the run summary
    pub stats: MapStats,
}

/// Row-level mapping metrics for one file
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MapStats {
    /// Data rows seen after the header row
    pub rows_read: usize,

    /// Rows mapped to a canonical record
    pub records_mapped: usize,

    /// Rows dropped because they could not cover the mandatory bindings
    pub rows_skipped: usize,

    /// Preamble rows skipped before the header (not counted as row skips)
    pub preamble_rows: usize,
}

impl MapStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapped share of data rows, as a percentage
    pub fn map_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.records_mapped as f64 / self.rows_read as f64) * 100.0
        }
    }

    /// Merge another file's metrics into a run-wide total
    pub fn merge(&mut self, other: &MapStats) {
        self.rows_read += other.rows_read;
        self.records_mapped += other.records_mapped;
        self.rows_skipped += other.rows_skipped;
        self.preamble_rows += other.preamble_rows;
    }
}
