//! Output writer test suite

pub mod package_tests;
pub mod writer_tests;

use crate::app::models::{
    AggregateRow, CanonicalRecord, EnrichedRecord, EntityKey, Money, ReportPeriod,
};
use std::str::FromStr;

pub fn enriched(entity: &str, legal: &str, state: &str, amount: &str) -> EnrichedRecord {
    EnrichedRecord {
        record: CanonicalRecord {
            entity_name: entity.to_string(),
            state_code: state.to_string(),
            period: ReportPeriod::new(2025, 1),
            expense_amount: amount.to_string(),
            account_code: "411".to_string(),
        },
        amount: Money::from_str(amount).unwrap(),
        legal_name: legal.to_string(),
        registry_id: "12345".to_string(),
    }
}

pub fn aggregate_row(legal: &str, state: &str, total: &str, count: u64) -> AggregateRow {
    AggregateRow {
        key: EntityKey {
            legal_name: legal.to_string(),
            state_code: state.to_string(),
        },
        total_expenses: Money::from_str(total).unwrap(),
        record_count: count,
    }
}
