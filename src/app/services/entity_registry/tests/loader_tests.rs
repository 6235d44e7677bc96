//! Tests for registry CSV loading

use crate::app::services::encoding::{MojibakeRepairer, TextDecoder};
use crate::app::services::entity_registry::EntityRegistry;
use crate::config::{EncodingConfig, MojibakeTable};
use std::path::PathBuf;
use tempfile::TempDir;

fn decoder() -> TextDecoder {
    TextDecoder::new(EncodingConfig::default().candidates)
}

fn repairer() -> MojibakeRepairer {
    MojibakeRepairer::new(MojibakeTable::default())
}

fn write_registry(dir: &TempDir, content: &[u8]) -> PathBuf {
    let path = dir.path().join("Relatorio_cadop.csv");
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_loads_utf8_registry() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(
        &dir,
        "REGISTRO_ANS;CNPJ;RAZAO_SOCIAL;NOME_FANTASIA;UF\n\
         12345;111;Acme Assistência Médica LTDA;Acme Saúde;SP\n\
         67890;222;Beta Planos de Saúde S.A.;;RJ\n"
            .as_bytes(),
    );

    let (registry, stats) = EntityRegistry::load(&path, &decoder(), &repairer())
        .await
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(stats.entries_loaded, 2);
    assert_eq!(stats.rows_skipped, 0);
    assert_eq!(stats.encoding_used, "utf-8");

    let acme = registry.lookup_exact("Acme Saúde").unwrap();
    assert_eq!(acme.registry_id, "12345");
    assert_eq!(acme.state.as_deref(), Some("SP"));
    // empty trade name becomes None
    let beta = registry.lookup_exact("Beta Planos de Saúde S.A.").unwrap();
    assert_eq!(beta.trade_name, None);
}

#[tokio::test]
async fn test_loads_cp1252_registry() {
    let dir = TempDir::new().unwrap();
    // "Saúde" with ú as the single cp1252 byte 0xFA
    let mut content = b"REGISTRO_ANS;RAZAO_SOCIAL;UF\n12345;Sa".to_vec();
    content.push(0xFA);
    content.extend_from_slice(b"de Total LTDA;SP\n");
    let path = write_registry(&dir, &content);

    let (registry, stats) = EntityRegistry::load(&path, &decoder(), &repairer())
        .await
        .unwrap();
    assert_eq!(stats.encoding_used, "cp1252");
    assert!(registry.lookup_exact("Saúde Total LTDA").is_some());
}

#[tokio::test]
async fn test_malformed_rows_skipped_and_counted() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(
        &dir,
        b"REGISTRO_ANS;RAZAO_SOCIAL;UF\n\
          12345;Acme LTDA;SP\n\
          ;Missing Id;SP\n\
          67890;;RJ\n",
    );

    let (registry, stats) = EntityRegistry::load(&path, &decoder(), &repairer())
        .await
        .unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(stats.rows_skipped, 2);
}

#[tokio::test]
async fn test_missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.csv");
    let result = EntityRegistry::load(&path, &decoder(), &repairer()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_registry_without_usable_columns_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, b"foo;bar\n1;2\n");
    let result = EntityRegistry::load(&path, &decoder(), &repairer()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_registry_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, b"REGISTRO_ANS;RAZAO_SOCIAL;UF\n");
    let result = EntityRegistry::load(&path, &decoder(), &repairer()).await;
    assert!(result.is_err());
}
