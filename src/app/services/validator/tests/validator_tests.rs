//! Tests for the rule chain and duplicate detection

use super::{default_validator, valid_record};
use crate::app::models::{Money, RejectReason, ReportPeriod, ValidationOutcome};
use crate::app::services::validator::Validator;
use crate::config::ValidationConfig;
use std::str::FromStr;

#[test]
fn test_valid_record_accepted_with_parsed_amount() {
    let mut validator = default_validator();
    match validator.validate(&valid_record()) {
        ValidationOutcome::Accepted { amount } => {
            assert_eq!(amount, Money::from_str("100.00").unwrap());
        }
        other => panic!("expected acceptance, got {:?}", other),
    }
    assert_eq!(validator.stats().accepted, 1);
}

#[test]
fn test_missing_entity() {
    let mut validator = default_validator();
    let mut record = valid_record();
    record.entity_name = "   ".to_string();
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::MissingEntity
        }
    );
}

#[test]
fn test_invalid_state() {
    let mut validator = default_validator();
    let mut record = valid_record();
    record.state_code = "XX".to_string();
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::InvalidState
        }
    );
}

#[test]
fn test_state_code_normalized_before_lookup() {
    let mut validator = default_validator();
    let mut record = valid_record();
    record.state_code = " sp ".to_string();
    assert!(validator.validate(&record).is_accepted());
}

#[test]
fn test_invalid_period_quarter_and_year() {
    let mut validator = default_validator();

    let mut record = valid_record();
    record.period = ReportPeriod::new(2025, 5);
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::InvalidPeriod
        }
    );

    let mut record = valid_record();
    record.period = ReportPeriod::new(1990, 1);
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::InvalidPeriod
        }
    );

    let mut record = valid_record();
    record.period = ReportPeriod::sentinel();
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::InvalidPeriod
        }
    );
}

#[test]
fn test_negative_and_non_numeric_amounts() {
    let mut validator = default_validator();

    let mut record = valid_record();
    record.expense_amount = "-5".to_string();
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::NegativeOrNonNumericAmount
        }
    );

    let mut record = valid_record();
    record.expense_amount = "N/A".to_string();
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::NegativeOrNonNumericAmount
        }
    );

    // zero is non-negative and acceptable
    let mut record = valid_record();
    record.expense_amount = "0.00".to_string();
    assert!(validator.validate(&record).is_accepted());
}

#[test]
fn test_rule_precedence_first_failure_wins() {
    // fails InvalidState (rule 2) and NegativeOrNonNumericAmount (rule 4):
    // the earlier rule names the rejection
    let mut validator = default_validator();
    let mut record = valid_record();
    record.state_code = "ZZ".to_string();
    record.expense_amount = "-10".to_string();
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::InvalidState
        }
    );
    assert_eq!(validator.stats().invalid_state, 1);
    assert_eq!(validator.stats().negative_or_non_numeric_amount, 0);
}

#[test]
fn test_duplicate_second_occurrence_rejected() {
    let mut validator = default_validator();
    assert!(validator.validate(&valid_record()).is_accepted());
    assert_eq!(
        validator.validate(&valid_record()),
        ValidationOutcome::Rejected {
            reason: RejectReason::DuplicateRecord
        }
    );
    assert_eq!(validator.stats().accepted, 1);
    assert_eq!(validator.stats().duplicate_record, 1);
    assert_eq!(validator.seen_count(), 1);
}

#[test]
fn test_rejected_record_does_not_poison_duplicate_set() {
    // a rejected occurrence must not block a later valid twin
    let mut validator = default_validator();
    let mut bad = valid_record();
    bad.expense_amount = "-1".to_string();
    assert!(!validator.validate(&bad).is_accepted());
    assert!(validator.validate(&valid_record()).is_accepted());
}

#[test]
fn test_duplicate_key_ignores_state_code() {
    let mut validator = default_validator();
    assert!(validator.validate(&valid_record()).is_accepted());
    let mut twin = valid_record();
    twin.state_code = "RJ".to_string();
    assert_eq!(
        validator.validate(&twin),
        ValidationOutcome::Rejected {
            reason: RejectReason::DuplicateRecord
        }
    );
}

#[test]
fn test_fresh_validator_has_clean_duplicate_set() {
    let mut first = default_validator();
    assert!(first.validate(&valid_record()).is_accepted());

    // state is per-instance: a new run starts clean
    let mut second = default_validator();
    assert!(second.validate(&valid_record()).is_accepted());
}

#[test]
fn test_configured_year_range() {
    let config = ValidationConfig {
        min_year: 2020,
        max_year: 2025,
        ..ValidationConfig::default()
    };
    let mut validator = Validator::new(&config);
    let mut record = valid_record();
    record.period = ReportPeriod::new(2019, 4);
    assert_eq!(
        validator.validate(&record),
        ValidationOutcome::Rejected {
            reason: RejectReason::InvalidPeriod
        }
    );
}
