//! In-memory aggregation backend

use super::{AggregationBackend, sort_rows};
use crate::app::models::{AggregateRow, EntityKey, Money};
use crate::{Error, Result};
use std::collections::HashMap;

/// Hash-map accumulator for runs that fit comfortably in memory
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    groups: HashMap<EntityKey, (Money, u64)>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain accumulated groups for migration into another backend
    pub(crate) fn drain_groups(&mut self) -> impl Iterator<Item = (EntityKey, Money, u64)> + '_ {
        self.groups
            .drain()
            .map(|(key, (total, count))| (key, total, count))
    }
}

impl AggregationBackend for InMemoryBackend {
    fn add(&mut self, key: EntityKey, amount: Money) -> Result<()> {
        let entry = self.groups.entry(key).or_insert((Money::ZERO, 0));
        entry.0 = entry.0.checked_add(amount).ok_or_else(|| {
            Error::aggregation("Expense total overflowed the fixed-point range")
        })?;
        entry.1 += 1;
        Ok(())
    }

    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn finish(self: Box<Self>) -> Result<Vec<AggregateRow>> {
        let mut rows: Vec<AggregateRow> = self
            .groups
            .into_iter()
            .map(|(key, (total_expenses, record_count))| AggregateRow {
                key,
                total_expenses,
                record_count,
            })
            .collect();
        sort_rows(&mut rows);
        Ok(rows)
    }
}
