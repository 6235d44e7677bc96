//! Output packaging tests

use crate::app::services::report_writer::package_outputs;
use std::fs::{self, File};
use tempfile::TempDir;
use zip::ZipArchive;

#[test]
fn test_packages_existing_outputs() {
    let dir = TempDir::new().unwrap();
    let enriched = dir.path().join("despesas_enriquecidas.csv");
    let report = dir.path().join("despesas_agregadas.csv");
    fs::write(&enriched, "header\nrow\n").unwrap();
    fs::write(&report, "header\n").unwrap();

    let package = dir.path().join("despesas_output.zip");
    let size = package_outputs(&package, &[enriched, report]).unwrap();
    assert!(size > 0);

    let mut archive = ZipArchive::new(File::open(&package).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"despesas_enriquecidas.csv".to_string()));
    assert!(names.contains(&"despesas_agregadas.csv".to_string()));
}

#[test]
fn test_missing_outputs_are_skipped() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("despesas_agregadas.csv");
    fs::write(&report, "header\n").unwrap();
    let absent = dir.path().join("registros_rejeitados.csv");

    let package = dir.path().join("despesas_output.zip");
    package_outputs(&package, &[report, absent]).unwrap();

    let archive = ZipArchive::new(File::open(&package).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
}
