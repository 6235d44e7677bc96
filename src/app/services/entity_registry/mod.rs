//! Active-operator registry (Relatorio_cadop)
//!
//! The registry CSV maps operator names to their legal name and ANS registry
//! id. It is loaded once per run, indexed for O(1) lookups, and shared
//! read-only with the enricher:
//!
//! - [`loader`] - CSV loading with encoding repair and alias-bound columns
//! - lookup indexes here: normalized-name exact match (legal and trade
//!   names) plus a token-sorted key for the fuzzy fallback
//!
//! A registry that fails to load is a fatal run-level error; individual
//! malformed registry rows are skipped and counted.

pub mod loader;

#[cfg(test)]
pub mod tests;

pub use loader::LoadStats;

use std::collections::HashMap;

/// One registry entry for an active operator
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegistryEntry {
    /// ANS registry number
    pub registry_id: String,

    /// Registered legal name
    pub legal_name: String,

    /// Trade name, when the registry carries one
    pub trade_name: Option<String>,

    /// Headquarters state
    pub state: Option<String>,
}

/// In-memory operator registry with name indexes
///
/// Read-only after load; entries are referenced by index so both name
/// indexes share one allocation per entry.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: Vec<RegistryEntry>,
    by_normalized_name: HashMap<String, usize>,
    by_token_key: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Build the registry and its indexes from loaded entries
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        let mut by_normalized_name = HashMap::new();
        let mut by_token_key = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            // first occurrence wins on index collisions; the registry lists
            // each operator once, duplicates indicate a dirty export
            by_normalized_name
                .entry(normalize_name(&entry.legal_name))
                .or_insert(index);
            by_token_key
                .entry(token_key(&entry.legal_name))
                .or_insert(index);

            if let Some(trade) = &entry.trade_name {
                if !trade.trim().is_empty() {
                    by_normalized_name
                        .entry(normalize_name(trade))
                        .or_insert(index);
                    by_token_key.entry(token_key(trade)).or_insert(index);
                }
            }
        }

        Self {
            entries,
            by_normalized_name,
            by_token_key,
        }
    }

    /// Case-insensitive, whitespace-normalized exact lookup
    pub fn lookup_exact(&self, name: &str) -> Option<&RegistryEntry> {
        self.by_normalized_name
            .get(&normalize_name(name))
            .map(|&i| &self.entries[i])
    }

    /// Token-sorted fuzzy lookup (word order insensitive)
    pub fn lookup_fuzzy(&self, name: &str) -> Option<&RegistryEntry> {
        self.by_token_key
            .get(&token_key(name))
            .map(|&i| &self.entries[i])
    }

    /// Entries whose legal or trade name contains the fragment
    pub fn search(&self, fragment: &str) -> Vec<&RegistryEntry> {
        let needle = normalize_name(fragment);
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| {
                normalize_name(&entry.legal_name).contains(&needle)
                    || entry
                        .trade_name
                        .as_deref()
                        .is_some_and(|t| normalize_name(t).contains(&needle))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}

/// Lowercase with collapsed whitespace, for exact comparison
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sorted lowercase tokens, for word-order-insensitive comparison
pub fn token_key(name: &str) -> String {
    let mut tokens: Vec<String> = name.split_whitespace().map(|w| w.to_lowercase()).collect();
    tokens.sort();
    tokens.join(" ")
}
