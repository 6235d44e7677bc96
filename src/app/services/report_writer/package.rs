//! Output packaging

use crate::{Error, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Bundle the run's output files into a single ZIP archive
///
/// Only files that actually exist are packaged; a run without rejects still
/// packages cleanly. Returns the archive size in bytes.
pub fn package_outputs(package_path: &Path, outputs: &[PathBuf]) -> Result<u64> {
    let file = File::create(package_path)
        .map_err(|e| Error::output_write(package_path.display().to_string(), e.to_string()))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut packaged = 0usize;
    for output in outputs {
        if !output.is_file() {
            continue;
        }
        let Some(name) = output.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        writer.start_file(name, options)?;
        let mut source = File::open(output)?;
        io::copy(&mut source, &mut writer)?;
        packaged += 1;
    }
    writer.finish()?.into_inner().map_err(|e| {
        Error::output_write(package_path.display().to_string(), e.to_string())
    })?;

    let size = std::fs::metadata(package_path)?.len();
    info!(
        "Packaged {} output files into {} ({} bytes)",
        packaged,
        package_path.display(),
        size
    );
    Ok(size)
}
