//! Tests for validation counters

use crate::app::models::RejectReason;
use crate::app::services::validator::ValidationStats;

#[test]
fn test_empty_stats() {
    let stats = ValidationStats::new();
    assert_eq!(stats.records_seen, 0);
    assert_eq!(stats.rejected_total(), 0);
    assert_eq!(stats.acceptance_rate(), 100.0);
}

#[test]
fn test_per_reason_counting() {
    let mut stats = ValidationStats::new();
    stats.record_accepted();
    stats.record_accepted();
    stats.record_rejected(RejectReason::InvalidState);
    stats.record_rejected(RejectReason::InvalidState);
    stats.record_rejected(RejectReason::DuplicateRecord);

    assert_eq!(stats.records_seen, 5);
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.rejected_total(), 3);
    assert_eq!(stats.rejected_by(RejectReason::InvalidState), 2);
    assert_eq!(stats.rejected_by(RejectReason::DuplicateRecord), 1);
    assert_eq!(stats.rejected_by(RejectReason::MissingEntity), 0);
    assert_eq!(stats.acceptance_rate(), 40.0);
}

#[test]
fn test_every_reason_has_a_counter() {
    let mut stats = ValidationStats::new();
    for reason in RejectReason::ALL {
        stats.record_rejected(reason);
    }
    for reason in RejectReason::ALL {
        assert_eq!(stats.rejected_by(reason), 1, "missing counter for {}", reason);
    }
    assert_eq!(stats.rejected_total(), 5);
}
