//! Rejected-record export

use super::{REJECTS_HEADER, open_csv_writer, output_size};
use crate::app::models::{CanonicalRecord, RejectReason};
use crate::config::OutputConfig;
use crate::{Error, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Writes rejected records with their rejection reason, in processing order
pub struct RejectsWriter {
    writer: csv::Writer<BufWriter<File>>,
    path: PathBuf,
    rows_written: u64,
}

impl RejectsWriter {
    pub fn create(path: PathBuf, config: &OutputConfig) -> Result<Self> {
        let mut writer = open_csv_writer(&path, config)?;
        writer
            .write_record(REJECTS_HEADER)
            .map_err(|e| Error::output_write(path.display().to_string(), e.to_string()))?;
        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    /// Write failures surface as output errors so the run stops rather
    /// than skipping the file and shipping a truncated export.
    pub fn write(&mut self, record: &CanonicalRecord, reason: RejectReason) -> Result<()> {
        self.writer
            .write_record([
                record.entity_name.as_str(),
                record.state_code.as_str(),
                &record.period.year.to_string(),
                &record.period.quarter.to_string(),
                record.account_code.as_str(),
                record.expense_amount.as_str(),
                reason.label(),
            ])
            .map_err(|e| Error::output_write(self.path.display().to_string(), e.to_string()))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush and close; returns (rows written, file size in bytes)
    pub fn finish(mut self) -> Result<(u64, u64)> {
        self.writer
            .flush()
            .map_err(|e| Error::output_write(self.path.display().to_string(), e.to_string()))?;
        drop(self.writer);
        let size = output_size(&self.path)?;
        info!(
            "Rejects export complete: {} rows, {} bytes",
            self.rows_written, size
        );
        Ok((self.rows_written, size))
    }
}
