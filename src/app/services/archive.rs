//! Archive discovery and extraction
//!
//! Inputs arrive either as loose CSV files or as the regulator's quarterly
//! ZIP bundles. This service walks the input tree for archives, extracts
//! each one into a per-archive directory under the run's extraction root,
//! and hands back the tabular files found inside. Junk entries such as
//! `__MACOSX` folders and non-tabular payloads are skipped, and entry paths
//! are sanitized so an archive can never write outside its own directory.

use crate::constants::{ARCHIVE_EXTENSION, extraction_dir_for, is_archive_junk, is_tabular_extension};
use crate::{Error, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Extraction metrics for the run summary
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtractionStats {
    pub archives_extracted: u64,
    pub entries_total: u64,
    pub files_extracted: u64,
    pub entries_skipped: u64,
}

impl ExtractionStats {
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.archives_extracted += other.archives_extracted;
        self.entries_total += other.entries_total;
        self.files_extracted += other.files_extracted;
        self.entries_skipped += other.entries_skipped;
    }
}

/// Find every ZIP archive under the input path, in deterministic order
pub fn discover_archives(input_path: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in WalkDir::new(input_path).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to walk {}", input_path.display()), e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_archive = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
        if is_archive {
            archives.push(path.to_path_buf());
        }
    }
    archives.sort();
    Ok(archives)
}

/// Extract one archive's tabular entries into the extraction root
///
/// Returns the extracted file paths alongside per-archive stats.
pub fn extract_archive(
    archive_path: &Path,
    extraction_root: &Path,
) -> Result<(Vec<PathBuf>, ExtractionStats)> {
    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("archive");
    let dest_dir = extraction_root.join(extraction_dir_for(stem));
    fs::create_dir_all(&dest_dir)?;

    let label = archive_path.display().to_string();
    let file = File::open(archive_path)
        .map_err(|e| Error::archive_extraction(&label, format!("Failed to open archive: {e}"), None))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| Error::archive_extraction(&label, "Not a readable ZIP archive", Some(e)))?;

    let mut stats = ExtractionStats {
        archives_extracted: 1,
        entries_total: archive.len() as u64,
        ..ExtractionStats::default()
    };
    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            Error::archive_extraction(&label, format!("Failed to read entry {index}"), Some(e))
        })?;
        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        if is_archive_junk(&entry_name) {
            debug!("Skipping junk entry '{}'", entry_name);
            stats.entries_skipped += 1;
            continue;
        }
        let tabular = Path::new(&entry_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_tabular_extension);
        if !tabular {
            debug!("Skipping non-tabular entry '{}'", entry_name);
            stats.entries_skipped += 1;
            continue;
        }

        // Flatten to the entry's file name; a traversal-shaped path can
        // never escape the per-archive directory this way.
        let Some(file_name) = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(|n| n.to_owned()))
        else {
            warn!("Skipping entry with unusable path '{}'", entry_name);
            stats.entries_skipped += 1;
            continue;
        };
        let dest_path = dest_dir.join(file_name);
        let mut output = File::create(&dest_path)?;
        io::copy(&mut entry, &mut output)?;
        stats.files_extracted += 1;
        extracted.push(dest_path);
    }

    extracted.sort();
    info!(
        "Extracted {} of {} entries from {}",
        stats.files_extracted,
        stats.entries_total,
        archive_path.display()
    );
    Ok((extracted, stats))
}
