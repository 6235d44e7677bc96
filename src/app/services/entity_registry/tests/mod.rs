//! Tests for the operator registry

pub mod loader_tests;

use crate::app::services::entity_registry::{EntityRegistry, RegistryEntry};

/// Registry entry fixture
pub fn entry(id: &str, legal: &str, trade: Option<&str>) -> RegistryEntry {
    RegistryEntry {
        registry_id: id.to_string(),
        legal_name: legal.to_string(),
        trade_name: trade.map(str::to_string),
        state: Some("SP".to_string()),
    }
}

/// Small registry with two operators
pub fn sample_registry() -> EntityRegistry {
    EntityRegistry::from_entries(vec![
        entry("12345", "Acme Assistência Médica LTDA", Some("Acme Saúde")),
        entry("67890", "Beta Planos de Saúde S.A.", None),
    ])
}
