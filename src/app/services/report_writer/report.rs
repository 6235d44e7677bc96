//! Aggregated expense report

use super::{REPORT_HEADER, open_csv_writer, output_size};
use crate::Result;
use crate::app::models::AggregateRow;
use crate::config::OutputConfig;
use std::path::Path;
use tracing::info;

/// Write the ordered aggregate rows; returns the file size in bytes
///
/// Rows are written exactly in the order the aggregator produced them, so
/// the report is byte-identical across runs over the same input.
pub fn write_aggregate_report(
    path: &Path,
    config: &OutputConfig,
    rows: &[AggregateRow],
) -> Result<u64> {
    let mut writer = open_csv_writer(path, config)?;
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.write_record([
            row.key.legal_name.as_str(),
            row.key.state_code.as_str(),
            &row.total_expenses.to_string(),
            &row.record_count.to_string(),
        ])?;
    }
    writer.flush()?;
    drop(writer);
    let size = output_size(path)?;
    info!("Aggregate report complete: {} rows, {} bytes", rows.len(), size);
    Ok(size)
}
