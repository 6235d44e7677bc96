//! Output writers
//!
//! Three CSV surfaces share one dialect: the streaming enriched-record
//! export, the aggregated expense report, and the optional rejected-record
//! export. All of them use the configured delimiter, emit UTF-8, and can be
//! prefixed with a BOM for spreadsheet compatibility. A final packaging
//! step can bundle whichever outputs a run produced into a single ZIP.

pub mod enriched;
pub mod package;
pub mod rejects;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use enriched::EnrichedExportWriter;
pub use package::package_outputs;
pub use rejects::RejectsWriter;
pub use report::write_aggregate_report;

use crate::config::OutputConfig;
use crate::constants::UTF8_BOM;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column order of the enriched-record export
pub const ENRICHED_HEADER: &[&str] = &[
    "entityName",
    "legalName",
    "stateCode",
    "year",
    "quarter",
    "accountCode",
    "expenseAmount",
    "registryId",
];

/// Column order of the aggregated expense report
pub const REPORT_HEADER: &[&str] = &[
    "legalName",
    "stateCode",
    "totalExpenses",
    "recordCount",
];

/// Column order of the rejected-record export
pub const REJECTS_HEADER: &[&str] = &[
    "entityName",
    "stateCode",
    "year",
    "quarter",
    "accountCode",
    "expenseAmount",
    "reason",
];

/// Open a CSV writer with the shared output dialect
pub(crate) fn open_csv_writer(
    path: &Path,
    config: &OutputConfig,
) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path)
        .map_err(|e| Error::output_write(path.display().to_string(), e.to_string()))?;
    let mut inner = BufWriter::new(file);
    if config.include_bom {
        inner
            .write_all(UTF8_BOM)
            .map_err(|e| Error::output_write(path.display().to_string(), e.to_string()))?;
    }
    Ok(csv::WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .from_writer(inner))
}

/// Size in bytes of a finished output file
pub(crate) fn output_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}
