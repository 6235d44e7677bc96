//! Registry CSV loading
//!
//! The cadop export shares the statement files' quirks: mixed encodings,
//! mojibake in operator names and occasional header renames, so loading
//! reuses the encoding chain and the alias-binding approach. Registry load
//! failure aborts the run before any aggregation happens.

use super::{EntityRegistry, RegistryEntry};
use crate::app::services::encoding::{MojibakeRepairer, TextDecoder};
use crate::app::services::schema_mapper::delimiter::detect_delimiter;
use crate::constants::{registry_aliases, DEFAULT_DELIMITER_CANDIDATES};
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Registry loading metrics
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub entries_loaded: usize,
    pub rows_skipped: usize,
    pub encoding_used: String,
    pub load_duration: Duration,
}

/// Column indexes bound from the registry header row
#[derive(Debug, Clone)]
struct RegistryBindings {
    registry_id: usize,
    legal_name: usize,
    trade_name: Option<usize>,
    state: Option<usize>,
}

impl RegistryBindings {
    fn bind(row: &StringRecord) -> Option<Self> {
        let normalized: Vec<String> = row
            .iter()
            .map(|cell| {
                cell.trim()
                    .trim_matches(|c| c == '"' || c == '\u{feff}')
                    .to_uppercase()
            })
            .collect();

        let find = |names: &[&str]| -> Option<usize> {
            normalized
                .iter()
                .position(|cell| names.iter().any(|a| cell == a))
        };

        Some(Self {
            registry_id: find(registry_aliases::REGISTRY_ID)?,
            legal_name: find(registry_aliases::LEGAL_NAME)?,
            trade_name: find(registry_aliases::TRADE_NAME),
            state: find(registry_aliases::STATE),
        })
    }
}

impl EntityRegistry {
    /// Load the registry CSV, returning the indexed registry and metrics
    pub async fn load(
        path: &Path,
        decoder: &TextDecoder,
        repairer: &MojibakeRepairer,
    ) -> Result<(Self, LoadStats)> {
        let start = Instant::now();
        let label = path.display().to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::registry_load(&label, format!("cannot read file: {}", e)))?;

        let decoded = decoder
            .decode(&bytes, &label)
            .map_err(|e| Error::registry_load(&label, e.to_string()))?;
        let text = repairer.repair(&decoded.text);

        let delimiter = detect_delimiter(&text, DEFAULT_DELIMITER_CANDIDATES);
        debug!("Registry delimiter {:?} for '{}'", delimiter, label);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut bindings: Option<RegistryBindings> = None;
        let mut entries = Vec::new();
        let mut rows_skipped = 0;

        for row in reader.records() {
            let row = row.map_err(|e| {
                Error::registry_load(&label, format!("malformed CSV structure: {}", e))
            })?;

            match &bindings {
                None => {
                    bindings = RegistryBindings::bind(&row);
                }
                Some(bound) => match parse_entry(&row, bound) {
                    Some(entry) => entries.push(entry),
                    None => rows_skipped += 1,
                },
            }
        }

        if bindings.is_none() {
            return Err(Error::registry_load(
                &label,
                "no header row binds the registry id and legal name columns",
            ));
        }
        if entries.is_empty() {
            return Err(Error::registry_load(&label, "registry has no usable entries"));
        }

        if rows_skipped > 0 {
            warn!("Skipped {} malformed registry rows in '{}'", rows_skipped, label);
        }

        let stats = LoadStats {
            entries_loaded: entries.len(),
            rows_skipped,
            encoding_used: decoded.encoding_used,
            load_duration: start.elapsed(),
        };

        info!(
            "Registry loaded: {} operators from '{}' in {:.2}s",
            stats.entries_loaded,
            label,
            stats.load_duration.as_secs_f64()
        );

        Ok((Self::from_entries(entries), stats))
    }
}

/// Parse one registry row; `None` when id or legal name is unusable
fn parse_entry(row: &StringRecord, bindings: &RegistryBindings) -> Option<RegistryEntry> {
    let cell = |index: usize| row.get(index).map(str::trim).unwrap_or("");

    let registry_id = cell(bindings.registry_id);
    let legal_name = cell(bindings.legal_name);
    if registry_id.is_empty() || legal_name.is_empty() {
        return None;
    }

    let optional = |index: Option<usize>| -> Option<String> {
        index
            .map(cell)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Some(RegistryEntry {
        registry_id: registry_id.to_string(),
        legal_name: legal_name.to_string(),
        trade_name: optional(bindings.trade_name),
        state: optional(bindings.state),
    })
}
