//! The ordered validation rule chain

use super::stats::ValidationStats;
use crate::app::models::{
    CanonicalRecord, Money, RejectReason, ReportPeriod, ValidationOutcome,
};
use crate::config::ValidationConfig;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::trace;

/// Run-scoped validator
///
/// Owns the duplicate-detection set and the per-reason counters for one run.
/// Construct a fresh instance per run; nothing is shared between runs.
#[derive(Debug)]
pub struct Validator {
    state_codes: HashSet<String>,
    min_year: i32,
    max_year: i32,
    seen: HashSet<(String, ReportPeriod, String)>,
    stats: ValidationStats,
}

impl Validator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            state_codes: config
                .state_codes
                .iter()
                .map(|c| c.trim().to_uppercase())
                .collect(),
            min_year: config.min_year,
            max_year: config.max_year,
            seen: HashSet::new(),
            stats: ValidationStats::new(),
        }
    }

    /// Classify one record; the first failing rule wins
    pub fn validate(&mut self, record: &CanonicalRecord) -> ValidationOutcome {
        match self.apply_rules(record) {
            Ok(amount) => {
                self.seen.insert(record.duplicate_key());
                self.stats.record_accepted();
                ValidationOutcome::Accepted { amount }
            }
            Err(reason) => {
                trace!("Rejected record for '{}': {}", record.entity_name, reason);
                self.stats.record_rejected(reason);
                ValidationOutcome::Rejected { reason }
            }
        }
    }

    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }

    /// Distinct accepted keys seen this run
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    fn apply_rules(&self, record: &CanonicalRecord) -> Result<Money, RejectReason> {
        // 1. MissingEntity
        if record.entity_name.trim().is_empty() {
            return Err(RejectReason::MissingEntity);
        }

        // 2. InvalidState
        let state = record.state_code.trim().to_uppercase();
        if !self.state_codes.contains(&state) {
            return Err(RejectReason::InvalidState);
        }

        // 3. InvalidPeriod
        let period = record.period;
        if !(1..=4).contains(&period.quarter)
            || !(self.min_year..=self.max_year).contains(&period.year)
        {
            return Err(RejectReason::InvalidPeriod);
        }

        // 4. NegativeOrNonNumericAmount
        let amount = Money::from_str(&record.expense_amount)
            .map_err(|_| RejectReason::NegativeOrNonNumericAmount)?;
        if amount.is_negative() {
            return Err(RejectReason::NegativeOrNonNumericAmount);
        }

        // 5. DuplicateRecord (against previously accepted records only)
        if self.seen.contains(&record.duplicate_key()) {
            return Err(RejectReason::DuplicateRecord);
        }

        Ok(amount)
    }
}
