//! Tests for the validation service

pub mod stats_tests;
pub mod validator_tests;

use crate::app::models::{CanonicalRecord, ReportPeriod};
use crate::app::services::validator::Validator;
use crate::config::ValidationConfig;

/// Validator with default Brazilian state codes and year range
pub fn default_validator() -> Validator {
    Validator::new(&ValidationConfig::default())
}

/// A record that passes every rule
pub fn valid_record() -> CanonicalRecord {
    CanonicalRecord {
        entity_name: "Acme LTDA".to_string(),
        state_code: "SP".to_string(),
        period: ReportPeriod::new(2025, 1),
        expense_amount: "100.00".to_string(),
        account_code: "411".to_string(),
    }
}
