//! Disk-spill aggregation backend
//!
//! Entries are appended as JSON lines to hash-selected partition files in a
//! run-scoped temporary directory. Each partition holds every entry for the
//! keys that hash into it, so partitions can be folded one at a time at
//! finish, keeping peak memory proportional to the largest partition
//! instead of the whole group set. The temporary directory is removed when
//! the backend is dropped.

use super::{AggregationBackend, sort_rows};
use crate::app::models::{AggregateRow, EntityKey, Money};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::debug;

/// One spilled accumulation step
#[derive(Debug, Serialize, Deserialize)]
struct SpillEntry {
    key: EntityKey,
    cents: i64,
    count: u64,
}

/// Hash-partitioned on-disk accumulator
#[derive(Debug)]
pub struct SpillBackend {
    _dir: TempDir,
    partitions: Vec<BufWriter<File>>,
    paths: Vec<PathBuf>,
    entries_written: usize,
}

impl SpillBackend {
    pub fn new(partition_count: usize) -> Result<Self> {
        let partition_count = partition_count.max(1);
        let dir = TempDir::new()?;
        let mut partitions = Vec::with_capacity(partition_count);
        let mut paths = Vec::with_capacity(partition_count);
        for index in 0..partition_count {
            let path = dir.path().join(format!("partition_{index:03}.jsonl"));
            partitions.push(BufWriter::new(File::create(&path)?));
            paths.push(path);
        }
        debug!(
            "Spill backend open: {} partitions under {}",
            partition_count,
            dir.path().display()
        );
        Ok(Self {
            _dir: dir,
            partitions,
            paths,
            entries_written: 0,
        })
    }

    /// Replay an already-accumulated group, preserving its record count
    pub(crate) fn absorb(&mut self, key: EntityKey, total: Money, count: u64) -> Result<()> {
        self.write_entry(SpillEntry {
            key,
            cents: total.cents(),
            count,
        })
    }

    fn write_entry(&mut self, entry: SpillEntry) -> Result<()> {
        let partition = partition_for(&entry.key, self.partitions.len());
        let line = serde_json::to_string(&entry)?;
        let writer = &mut self.partitions[partition];
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        self.entries_written += 1;
        Ok(())
    }
}

fn partition_for(key: &EntityKey, partition_count: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() as usize) % partition_count
}

impl AggregationBackend for SpillBackend {
    fn add(&mut self, key: EntityKey, amount: Money) -> Result<()> {
        self.write_entry(SpillEntry {
            key,
            cents: amount.cents(),
            count: 1,
        })
    }

    fn group_count(&self) -> usize {
        // Every spilled entry could be a distinct key, so this is an upper
        // bound on the group count; exact counting would defeat the point
        // of spilling. The final report counts groups from the folded rows.
        self.entries_written
    }

    fn finish(mut self: Box<Self>) -> Result<Vec<AggregateRow>> {
        for writer in &mut self.partitions {
            writer.flush()?;
        }
        drop(std::mem::take(&mut self.partitions));

        let mut rows = Vec::new();
        for path in &self.paths {
            let mut groups: HashMap<EntityKey, (Money, u64)> = HashMap::new();
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let entry: SpillEntry = serde_json::from_str(&line?)?;
                let slot = groups.entry(entry.key).or_insert((Money::ZERO, 0));
                slot.0 = slot
                    .0
                    .checked_add(Money::from_cents(entry.cents))
                    .ok_or_else(|| {
                        Error::aggregation("Expense total overflowed the fixed-point range")
                    })?;
                slot.1 += entry.count;
            }
            rows.extend(
                groups
                    .into_iter()
                    .map(|(key, (total_expenses, record_count))| AggregateRow {
                        key,
                        total_expenses,
                        record_count,
                    }),
            );
        }
        sort_rows(&mut rows);
        Ok(rows)
    }
}
