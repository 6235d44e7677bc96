//! Tests for the encoding normalization service


use crate::config::MojibakeTable;

/// Shipped default repair table
pub fn default_table() -> MojibakeTable {
    MojibakeTable::default()
}
