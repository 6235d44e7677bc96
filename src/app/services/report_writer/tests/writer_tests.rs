//! CSV writer tests

use super::{aggregate_row, enriched};
use crate::app::models::{CanonicalRecord, RejectReason, ReportPeriod};
use crate::app::services::report_writer::{
    EnrichedExportWriter, RejectsWriter, write_aggregate_report,
};
use crate::config::OutputConfig;
use crate::constants::UTF8_BOM;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_enriched_export_header_and_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("enriched.csv");
    let mut writer = EnrichedExportWriter::create(path.clone(), &OutputConfig::default()).unwrap();
    writer
        .write(&enriched("acme saúde", "Acme LTDA", "SP", "100.00"))
        .unwrap();
    let (rows, size) = writer.finish().unwrap();
    assert_eq!(rows, 1);
    assert!(size > 0);

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "entityName;legalName;stateCode;year;quarter;accountCode;expenseAmount;registryId"
    );
    assert_eq!(
        lines.next().unwrap(),
        "acme saúde;Acme LTDA;SP;2025;1;411;100.00;12345"
    );
    assert!(lines.next().is_none());
}

#[test]
fn test_aggregate_report_rows_in_given_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.csv");
    let rows = vec![
        aggregate_row("Beta Med", "RJ", "200.00", 4),
        aggregate_row("Acme LTDA", "SP", "100.00", 1),
    ];
    write_aggregate_report(&path, &OutputConfig::default(), &rows).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "legalName;stateCode;totalExpenses;recordCount");
    assert_eq!(lines[1], "Beta Med;RJ;200.00;4");
    assert_eq!(lines[2], "Acme LTDA;SP;100.00;1");
}

#[test]
fn test_rejects_export_carries_reason_and_raw_amount() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rejects.csv");
    let mut writer = RejectsWriter::create(path.clone(), &OutputConfig::default()).unwrap();
    let record = CanonicalRecord {
        entity_name: "Acme".to_string(),
        state_code: "SP".to_string(),
        period: ReportPeriod::new(2025, 1),
        expense_amount: "abc".to_string(),
        account_code: "411".to_string(),
    };
    writer
        .write(&record, RejectReason::NegativeOrNonNumericAmount)
        .unwrap();
    writer.finish().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "entityName;stateCode;year;quarter;accountCode;expenseAmount;reason"
    );
    assert_eq!(
        lines[1],
        format!(
            "Acme;SP;2025;1;411;abc;{}",
            RejectReason::NegativeOrNonNumericAmount.label()
        )
    );
}

#[test]
fn test_bom_prefix_when_configured() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.csv");
    let config = OutputConfig {
        include_bom: true,
        ..OutputConfig::default()
    };
    write_aggregate_report(&path, &config, &[]).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
}

#[test]
fn test_custom_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.csv");
    let config = OutputConfig {
        delimiter: ',',
        ..OutputConfig::default()
    };
    write_aggregate_report(&path, &config, &[aggregate_row("Acme", "SP", "1.00", 1)]).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("legalName,stateCode,totalExpenses,recordCount"));
}

#[test]
fn test_fields_containing_delimiter_are_quoted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.csv");
    write_aggregate_report(
        &path,
        &OutputConfig::default(),
        &[aggregate_row("Acme; Filial Sul", "SP", "1.00", 1)],
    )
    .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"Acme; Filial Sul\";SP;1.00;1"));
}
