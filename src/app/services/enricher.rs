//! Registry enrichment for accepted records
//!
//! Joins each accepted record against the operator registry with an ordered
//! strategy chain: exact normalized-name match first, then (when enabled)
//! the token-sorted fuzzy match. A miss never drops the record; it is
//! emitted with the source entity name as its legal name and the configured
//! unmatched sentinel as its registry id. Record count in equals record
//! count out, always.

use crate::app::models::{CanonicalRecord, EnrichedRecord, Money};
use crate::app::services::entity_registry::{EntityRegistry, RegistryEntry};
use crate::config::EnrichmentConfig;
use std::sync::Arc;
use tracing::trace;

/// Enrichment metrics for the run summary
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnrichmentStats {
    pub records_in: u64,
    pub exact_matches: u64,
    pub fuzzy_matches: u64,
    pub unmatched: u64,
}

impl EnrichmentStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matched share of enriched records, as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.records_in == 0 {
            0.0
        } else {
            ((self.exact_matches + self.fuzzy_matches) as f64 / self.records_in as f64) * 100.0
        }
    }
}

/// Joins accepted records against the shared read-only registry
#[derive(Debug)]
pub struct Enricher {
    registry: Arc<EntityRegistry>,
    fuzzy_matching: bool,
    unmatched_registry_id: String,
}

impl Enricher {
    pub fn new(registry: Arc<EntityRegistry>, config: &EnrichmentConfig) -> Self {
        Self {
            registry,
            fuzzy_matching: config.fuzzy_matching,
            unmatched_registry_id: config.unmatched_registry_id.clone(),
        }
    }

    /// Enrich one accepted record; always emits exactly one record
    pub fn enrich(
        &self,
        record: CanonicalRecord,
        amount: Money,
        stats: &mut EnrichmentStats,
    ) -> EnrichedRecord {
        stats.records_in += 1;

        if let Some(entry) = self.registry.lookup_exact(&record.entity_name) {
            stats.exact_matches += 1;
            return enriched_from(record, amount, entry);
        }

        if self.fuzzy_matching {
            if let Some(entry) = self.registry.lookup_fuzzy(&record.entity_name) {
                stats.fuzzy_matches += 1;
                return enriched_from(record, amount, entry);
            }
        }

        trace!("No registry match for '{}'", record.entity_name);
        stats.unmatched += 1;
        let legal_name = record.entity_name.trim().to_string();
        EnrichedRecord {
            record,
            amount,
            legal_name,
            registry_id: self.unmatched_registry_id.clone(),
        }
    }
}

fn enriched_from(record: CanonicalRecord, amount: Money, entry: &RegistryEntry) -> EnrichedRecord {
    EnrichedRecord {
        record,
        amount,
        legal_name: entry.legal_name.clone(),
        registry_id: entry.registry_id.clone(),
    }
}
