//! Streaming enriched-record export

use super::{ENRICHED_HEADER, open_csv_writer, output_size};
use crate::app::models::EnrichedRecord;
use crate::config::OutputConfig;
use crate::{Error, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Writes enriched records as they are produced, one row per record
///
/// Rows appear in processing order, never buffered run-wide, so the export
/// stays flat in memory regardless of input volume.
pub struct EnrichedExportWriter {
    writer: csv::Writer<BufWriter<File>>,
    path: PathBuf,
    rows_written: u64,
}

impl EnrichedExportWriter {
    pub fn create(path: PathBuf, config: &OutputConfig) -> Result<Self> {
        let mut writer = open_csv_writer(&path, config)?;
        writer
            .write_record(ENRICHED_HEADER)
            .map_err(|e| Error::output_write(path.display().to_string(), e.to_string()))?;
        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    /// Write failures surface as output errors so the run stops rather
    /// than skipping the file and shipping a truncated export.
    pub fn write(&mut self, record: &EnrichedRecord) -> Result<()> {
        self.writer
            .write_record([
                record.record.entity_name.as_str(),
                record.legal_name.as_str(),
                record.record.state_code.as_str(),
                &record.record.period.year.to_string(),
                &record.record.period.quarter.to_string(),
                record.record.account_code.as_str(),
                &record.amount.to_string(),
                record.registry_id.as_str(),
            ])
            .map_err(|e| Error::output_write(self.path.display().to_string(), e.to_string()))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and close; returns (rows written, file size in bytes)
    pub fn finish(mut self) -> Result<(u64, u64)> {
        self.writer
            .flush()
            .map_err(|e| Error::output_write(self.path.display().to_string(), e.to_string()))?;
        drop(self.writer);
        let size = output_size(&self.path)?;
        info!(
            "Enriched export complete: {} rows, {} bytes",
            self.rows_written, size
        );
        Ok((self.rows_written, size))
    }
}
