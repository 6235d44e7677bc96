//! Per-entity expense aggregation
//!
//! Accumulates (legal name, state) expense totals across the whole run and
//! produces the deterministically ordered aggregate report: descending
//! total, ascending entity key on ties. Two backends share one trait: an
//! in-memory hash map for typical runs, and a hash-partitioned disk spill
//! for runs whose distinct-group count exceeds the configured limit. The
//! facade starts in memory and migrates transparently when the limit is
//! crossed, so callers never pick a backend themselves.

pub mod aggregator;
pub mod memory;
pub mod spill;

#[cfg(test)]
pub mod tests;

pub use aggregator::{AggregationStats, Aggregator};
pub use memory::InMemoryBackend;
pub use spill::SpillBackend;

use crate::Result;
use crate::app::models::{AggregateRow, EntityKey, Money};

/// Accumulation strategy behind the [`Aggregator`] facade
pub trait AggregationBackend {
    /// Fold one accepted amount into its entity group
    fn add(&mut self, key: EntityKey, amount: Money) -> Result<()>;

    /// Distinct groups accumulated so far
    fn group_count(&self) -> usize;

    /// Consume the backend and produce the final ordered rows
    fn finish(self: Box<Self>) -> Result<Vec<AggregateRow>>;
}

/// Report ordering: total descending, entity key ascending on ties
pub(crate) fn sort_rows(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| {
        b.total_expenses
            .cmp(&a.total_expenses)
            .then_with(|| a.key.cmp(&b.key))
    });
}
