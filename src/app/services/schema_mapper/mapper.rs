//! Single-pass file mapping orchestration

use super::delimiter::detect_delimiter;
use super::field_parsers::{normalize_decimal, period_from_cells, period_from_filename};
use super::header::ColumnBindings;
use super::stats::{MapResult, MapStats};
use crate::app::models::{CanonicalRecord, ReportPeriod};
use crate::config::SchemaConfig;
use crate::{Error, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// Maps normalized file text onto canonical records
///
/// One mapper instance serves a whole run; each call to [`map_file`] is a
/// single pass over one file and carries no state across files.
///
/// [`map_file`]: SchemaMapper::map_file
#[derive(Debug, Clone)]
pub struct SchemaMapper {
    config: SchemaConfig,
}

impl SchemaMapper {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    /// Map one decoded, repaired file into canonical records
    ///
    /// Fails only when no row binds the mandatory columns (no header row);
    /// every row-level problem is counted in the stats instead.
    pub fn map_file(&self, path: &Path, text: &str) -> Result<MapResult> {
        let file_label = path.display().to_string();
        let delimiter = detect_delimiter(text, &self.config.delimiter_candidates);
        debug!("Detected delimiter {:?} for '{}'", delimiter, file_label);

        let fallback_period = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(period_from_filename);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut stats = MapStats::new();
        let mut records = Vec::new();
        let mut bindings: Option<ColumnBindings> = None;

        for row in reader.records() {
            let row = row.map_err(|e| {
                Error::csv_parsing(&file_label, "malformed CSV structure", Some(e))
            })?;

            match &bindings {
                None => match ColumnBindings::bind(&row, &self.config.aliases) {
                    Some(found) => {
                        debug!("Header row bound for '{}': {:?}", file_label, found);
                        bindings = Some(found);
                    }
                    None => stats.preamble_rows += 1,
                },
                Some(bound) => {
                    stats.rows_read += 1;
                    match self.map_row(&row, bound, fallback_period) {
                        Some(record) => {
                            records.push(record);
                            stats.records_mapped += 1;
                        }
                        None => stats.rows_skipped += 1,
                    }
                }
            }
        }

        if bindings.is_none() {
            return Err(Error::schema_mapping(
                &file_label,
                "no row binds the mandatory columns (entity, state, amount, account)",
            ));
        }

        if stats.rows_skipped > 0 {
            warn!(
                "Skipped {} of {} rows in '{}'",
                stats.rows_skipped, stats.rows_read, file_label
            );
        }

        Ok(MapResult { records, stats })
    }

    /// Map one data row; `None` when it cannot cover the mandatory bindings
    fn map_row(
        &self,
        row: &csv::StringRecord,
        bindings: &ColumnBindings,
        fallback_period: Option<ReportPeriod>,
    ) -> Option<CanonicalRecord> {
        // ragged footer rows and malformed lines fall short of the bindings
        if row.len() <= bindings.max_mandatory_index() {
            return None;
        }

        let cell = |index: usize| row.get(index).unwrap_or("").trim();

        let period = match (bindings.year, bindings.quarter) {
            (Some(y), Some(q)) => period_from_cells(cell(y), cell(q))
                .or(fallback_period)
                .unwrap_or_else(ReportPeriod::sentinel),
            _ => fallback_period.unwrap_or_else(ReportPeriod::sentinel),
        };

        Some(CanonicalRecord {
            entity_name: cell(bindings.entity_name).to_string(),
            state_code: cell(bindings.state_code).to_string(),
            period,
            expense_amount: normalize_decimal(cell(bindings.expense_amount)),
            account_code: cell(bindings.account_code).to_string(),
        })
    }
}
