//! Tests for single-pass file mapping

use super::default_schema;
use crate::app::models::ReportPeriod;
use crate::app::services::schema_mapper::SchemaMapper;
use std::path::Path;

fn mapper() -> SchemaMapper {
    SchemaMapper::new(default_schema())
}

#[test]
fn test_maps_file_with_preamble() {
    let text = "Demonstrações Contábeis - ANS\nExportado em;2025-06-30\n\
                RAZAO_SOCIAL;UF;ANO;TRIMESTRE;CD_CONTA_CONTABIL;VL_SALDO_FINAL\n\
                Acme LTDA;SP;2025;1;411;1.234,56\n\
                Beta S.A.;RJ;2025;1;411;100,00\n";

    let result = mapper().map_file(Path::new("1T2025.csv"), text).unwrap();
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.stats.preamble_rows, 2);
    assert_eq!(result.stats.rows_read, 2);
    assert_eq!(result.stats.records_mapped, 2);
    assert_eq!(result.stats.rows_skipped, 0);

    let first = &result.records[0];
    assert_eq!(first.entity_name, "Acme LTDA");
    assert_eq!(first.state_code, "SP");
    assert_eq!(first.period, ReportPeriod::new(2025, 1));
    assert_eq!(first.expense_amount, "1234.56");
    assert_eq!(first.account_code, "411");
}

#[test]
fn test_ragged_footer_rows_are_skipped_and_counted() {
    let text = "RAZAO_SOCIAL;UF;CONTA;VALOR\n\
                Acme LTDA;SP;411;100,00\n\
                Total geral\n\
                ;;\n";

    let result = mapper().map_file(Path::new("2025_1.csv"), text).unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.stats.rows_read, 3);
    assert_eq!(result.stats.rows_skipped, 2);
}

#[test]
fn test_period_falls_back_to_filename() {
    let text = "RAZAO_SOCIAL;UF;CONTA;VALOR\nAcme;SP;411;1,00\n";
    let result = mapper().map_file(Path::new("4T2023.csv"), text).unwrap();
    assert_eq!(result.records[0].period, ReportPeriod::new(2023, 4));
}

#[test]
fn test_missing_period_yields_sentinel() {
    let text = "RAZAO_SOCIAL;UF;CONTA;VALOR\nAcme;SP;411;1,00\n";
    let result = mapper().map_file(Path::new("despesas.csv"), text).unwrap();
    assert!(result.records[0].period.is_sentinel());
}

#[test]
fn test_unparseable_period_cells_fall_back_to_filename() {
    let text = "RAZAO_SOCIAL;UF;ANO;TRIMESTRE;CONTA;VALOR\nAcme;SP;????;?;411;1,00\n";
    let result = mapper().map_file(Path::new("2T2024.csv"), text).unwrap();
    assert_eq!(result.records[0].period, ReportPeriod::new(2024, 2));
}

#[test]
fn test_file_without_header_fails_mapping() {
    let text = "just some notes\nnothing tabular here\n";
    let err = mapper().map_file(Path::new("notes.csv"), text).unwrap_err();
    assert!(err.to_string().contains("notes.csv"));
}

#[test]
fn test_comma_delimited_vintage() {
    let text = "OPERADORA,ESTADO,CONTA,VLR\nAcme,SP,411,100.50\n";
    // ESTADO is an alias for the state column; VLR for the amount
    let result = mapper().map_file(Path::new("1T2020.csv"), text).unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].expense_amount, "100.50");
}

#[test]
fn test_non_numeric_amount_reaches_the_record() {
    let text = "RAZAO_SOCIAL;UF;CONTA;VALOR\nAcme;SP;411;N/A\n";
    let result = mapper().map_file(Path::new("1T2025.csv"), text).unwrap();
    // mapping is structural only; the validator rejects this amount
    assert_eq!(result.records[0].expense_amount, "N/A");
}
