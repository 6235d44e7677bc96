//! Facade and migration tests

use super::{key, money};
use crate::app::services::aggregator::Aggregator;
use crate::config::AggregationConfig;

fn small_limit_config(limit: usize) -> AggregationConfig {
    AggregationConfig {
        group_memory_limit: limit,
        spill_partitions: 4,
    }
}

#[test]
fn test_stays_in_memory_under_limit() {
    let mut aggregator = Aggregator::new(&small_limit_config(10));
    aggregator.add(key("Acme", "SP"), money("1.00")).unwrap();
    aggregator.add(key("Beta", "RJ"), money("2.00")).unwrap();
    assert!(!aggregator.is_spilled());

    let (rows, stats) = aggregator.finish().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!stats.spilled);
    assert_eq!(stats.records_aggregated, 2);
    assert_eq!(stats.groups, 2);
}

#[test]
fn test_migrates_past_group_limit() {
    let mut aggregator = Aggregator::new(&small_limit_config(2));
    aggregator.add(key("Acme", "SP"), money("10.00")).unwrap();
    aggregator.add(key("Acme", "SP"), money("5.00")).unwrap();
    aggregator.add(key("Beta", "RJ"), money("1.00")).unwrap();
    assert!(!aggregator.is_spilled());

    // Third distinct group crosses the limit and triggers migration
    aggregator.add(key("Gamma", "MG"), money("2.00")).unwrap();
    assert!(aggregator.is_spilled());

    // Post-migration adds land on the spill backend
    aggregator.add(key("Acme", "SP"), money("0.50")).unwrap();

    let (rows, stats) = aggregator.finish().unwrap();
    assert!(stats.spilled);
    assert_eq!(stats.records_aggregated, 5);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].key, key("Acme", "SP"));
    assert_eq!(rows[0].total_expenses.to_string(), "15.50");
    assert_eq!(rows[0].record_count, 3);
}

#[test]
fn test_migration_preserves_totals_and_counts() {
    let mut in_memory = Aggregator::new(&small_limit_config(1000));
    let mut spilled = Aggregator::new(&small_limit_config(1));

    let inputs = [
        ("Acme", "SP", "10.10"),
        ("Beta", "RJ", "20.20"),
        ("Acme", "SP", "0.01"),
        ("Gamma", "MG", "3.33"),
        ("Beta", "RJ", "20.20"),
    ];
    for (name, state, amount) in inputs {
        in_memory.add(key(name, state), money(amount)).unwrap();
        spilled.add(key(name, state), money(amount)).unwrap();
    }
    assert!(spilled.is_spilled());

    let (memory_rows, _) = in_memory.finish().unwrap();
    let (spill_rows, _) = spilled.finish().unwrap();
    assert_eq!(memory_rows, spill_rows);
}

#[test]
fn test_spilled_group_count_is_an_upper_bound() {
    let mut aggregator = Aggregator::new(&small_limit_config(1));
    aggregator.add(key("Acme", "SP"), money("1.00")).unwrap();
    aggregator.add(key("Beta", "RJ"), money("1.00")).unwrap();
    assert!(aggregator.is_spilled());

    // A key first seen after migration still moves the reported scale
    aggregator.add(key("Gamma", "MG"), money("1.00")).unwrap();
    let reported = aggregator.group_count();

    let (rows, _) = aggregator.finish().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(reported >= rows.len());
}

#[test]
fn test_empty_run_produces_empty_report() {
    let aggregator = Aggregator::new(&AggregationConfig::default());
    let (rows, stats) = aggregator.finish().unwrap();
    assert!(rows.is_empty());
    assert_eq!(stats.records_aggregated, 0);
    assert_eq!(stats.groups, 0);
}
