//! Per-reason validation counters

use crate::app::models::RejectReason;

/// Run-scoped validation metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationStats {
    pub records_seen: u64,
    pub accepted: u64,
    pub missing_entity: u64,
    pub invalid_state: u64,
    pub invalid_period: u64,
    pub negative_or_non_numeric_amount: u64,
    pub duplicate_record: u64,
}

impl ValidationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self) {
        self.records_seen += 1;
        self.accepted += 1;
    }

    pub fn record_rejected(&mut self, reason: RejectReason) {
        self.records_seen += 1;
        match reason {
            RejectReason::MissingEntity => self.missing_entity += 1,
            RejectReason::InvalidState => self.invalid_state += 1,
            RejectReason::InvalidPeriod => self.invalid_period += 1,
            RejectReason::NegativeOrNonNumericAmount => {
                self.negative_or_non_numeric_amount += 1
            }
            RejectReason::DuplicateRecord => self.duplicate_record += 1,
        }
    }

    pub fn rejected_total(&self) -> u64 {
        self.records_seen - self.accepted
    }

    /// Count for one rejection reason
    pub fn rejected_by(&self, reason: RejectReason) -> u64 {
        match reason {
            RejectReason::MissingEntity => self.missing_entity,
            RejectReason::InvalidState => self.invalid_state,
            RejectReason::InvalidPeriod => self.invalid_period,
            RejectReason::NegativeOrNonNumericAmount => self.negative_or_non_numeric_amount,
            RejectReason::DuplicateRecord => self.duplicate_record,
        }
    }

    /// Accepted share of all records, as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.records_seen == 0 {
            100.0
        } else {
            (self.accepted as f64 / self.records_seen as f64) * 100.0
        }
    }
}
