//! Aggregation facade with transparent memory-to-disk migration

use super::{AggregationBackend, InMemoryBackend, SpillBackend};
use crate::Result;
use crate::app::models::{AggregateRow, EntityKey, Money};
use crate::config::AggregationConfig;
use std::time::Duration;
use tracing::info;

/// Aggregation metrics for the run summary
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AggregationStats {
    pub records_aggregated: u64,
    pub groups: u64,
    pub spilled: bool,
    #[serde(skip)]
    pub finish_duration: Duration,
}

enum Backend {
    Memory(InMemoryBackend),
    Spill(SpillBackend),
}

/// Run-scoped expense accumulator
///
/// Starts on the in-memory backend and migrates every accumulated group to
/// the spill backend the first time the distinct-group count crosses the
/// configured limit. Totals and record counts survive the migration intact.
pub struct Aggregator {
    backend: Backend,
    group_memory_limit: usize,
    spill_partitions: usize,
    records_aggregated: u64,
}

impl Aggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            backend: Backend::Memory(InMemoryBackend::new()),
            group_memory_limit: config.group_memory_limit,
            spill_partitions: config.spill_partitions,
            records_aggregated: 0,
        }
    }

    /// Fold one accepted amount into its entity group
    pub fn add(&mut self, key: EntityKey, amount: Money) -> Result<()> {
        match &mut self.backend {
            Backend::Memory(memory) => {
                memory.add(key, amount)?;
                if memory.group_count() > self.group_memory_limit {
                    self.migrate_to_spill()?;
                }
            }
            Backend::Spill(spill) => spill.add(key, amount)?,
        }
        self.records_aggregated += 1;
        Ok(())
    }

    fn migrate_to_spill(&mut self) -> Result<()> {
        let Backend::Memory(memory) = &mut self.backend else {
            return Ok(());
        };
        info!(
            "Group count exceeded {}, spilling aggregation to disk",
            self.group_memory_limit
        );
        let mut spill = SpillBackend::new(self.spill_partitions)?;
        for (key, total, count) in memory.drain_groups() {
            spill.absorb(key, total, count)?;
        }
        self.backend = Backend::Spill(spill);
        Ok(())
    }

    pub fn group_count(&self) -> usize {
        match &self.backend {
            Backend::Memory(memory) => memory.group_count(),
            Backend::Spill(spill) => spill.group_count(),
        }
    }

    pub fn is_spilled(&self) -> bool {
        matches!(self.backend, Backend::Spill(_))
    }

    /// Produce the final ordered report rows
    pub fn finish(self) -> Result<(Vec<AggregateRow>, AggregationStats)> {
        let start = std::time::Instant::now();
        let spilled = self.is_spilled();
        let rows = match self.backend {
            Backend::Memory(memory) => Box::new(memory).finish()?,
            Backend::Spill(spill) => Box::new(spill).finish()?,
        };
        let stats = AggregationStats {
            records_aggregated: self.records_aggregated,
            groups: rows.len() as u64,
            spilled,
            finish_duration: start.elapsed(),
        };
        Ok((rows, stats))
    }
}
