//! Data models for the ANS expense pipeline
//!
//! This module contains the record shapes that flow through the pipeline
//! stages: canonical records produced by the schema mapper, validation
//! outcomes, registry-enriched records and the final aggregate rows.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod money;

pub use money::{Money, MoneyError};

// =============================================================================
// Report Period
// =============================================================================

/// A reporting period: calendar year plus quarter (1..=4)
///
/// The sentinel `(0, 0)` marks records whose source file carried no period
/// information at all; the validator rejects it as an invalid period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ReportPeriod {
    pub year: i32,
    pub quarter: u8,
}

impl ReportPeriod {
    pub fn new(year: i32, quarter: u8) -> Self {
        Self { year, quarter }
    }

    /// Placeholder for records with no derivable period
    pub fn sentinel() -> Self {
        Self { year: 0, quarter: 0 }
    }

    pub fn is_sentinel(&self) -> bool {
        self.year == 0 && self.quarter == 0
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.quarter, self.year)
    }
}

// =============================================================================
// Canonical Record
// =============================================================================

/// A source row mapped onto the canonical column vocabulary
///
/// The expense amount is carried as a separator-normalized decimal string at
/// this stage: numeric coercion happens in the validator, so non-numeric
/// values surface as `NegativeOrNonNumericAmount` rejections instead of
/// silently vanishing during mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Operator name as read from the source file (after mojibake repair)
    pub entity_name: String,

    /// Two-letter federative unit code
    pub state_code: String,

    /// Reporting period from period columns or the source filename
    pub period: ReportPeriod,

    /// Separator-normalized decimal string, parsed during validation
    pub expense_amount: String,

    /// Accounting chart code for the expense line
    pub account_code: String,
}

impl CanonicalRecord {
    /// Key used for run-scoped duplicate detection
    ///
    /// Deliberately excludes the state code: the regulator publishes one
    /// accounting line per operator, period and account.
    pub fn duplicate_key(&self) -> (String, ReportPeriod, String) {
        (
            self.entity_name.trim().to_string(),
            self.period,
            self.account_code.trim().to_string(),
        )
    }
}

// =============================================================================
// Validation Outcome
// =============================================================================

/// Why a record was rejected, in rule order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    MissingEntity,
    InvalidState,
    InvalidPeriod,
    NegativeOrNonNumericAmount,
    DuplicateRecord,
}

impl RejectReason {
    /// All reasons in validation rule order
    pub const ALL: [RejectReason; 5] = [
        RejectReason::MissingEntity,
        RejectReason::InvalidState,
        RejectReason::InvalidPeriod,
        RejectReason::NegativeOrNonNumericAmount,
        RejectReason::DuplicateRecord,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::MissingEntity => "MissingEntity",
            RejectReason::InvalidState => "InvalidState",
            RejectReason::InvalidPeriod => "InvalidPeriod",
            RejectReason::NegativeOrNonNumericAmount => "NegativeOrNonNumericAmount",
            RejectReason::DuplicateRecord => "DuplicateRecord",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of one canonical record, produced once and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Record passed every rule; carries the parsed non-negative amount
    Accepted { amount: Money },
    /// First failing rule in the fixed order
    Rejected { reason: RejectReason },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }
}

// =============================================================================
// Enriched Record
// =============================================================================

/// An accepted record joined against the operator registry
///
/// Enrichment never drops a record: on a registry miss the legal name falls
/// back to the source entity name and the registry id is the configured
/// unmatched sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub record: CanonicalRecord,

    /// Parsed, validated expense amount
    pub amount: Money,

    /// Registry legal name, or the source entity name when unmatched
    pub legal_name: String,

    /// Registry id, or the unmatched sentinel
    pub registry_id: String,
}

impl EnrichedRecord {
    /// Grouping key for aggregation
    pub fn entity_key(&self) -> EntityKey {
        EntityKey {
            legal_name: self.legal_name.clone(),
            state_code: self.record.state_code.clone(),
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregation group key; the derived ordering (legal name, then state code)
/// is the deterministic tiebreak for the final report
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub legal_name: String,
    pub state_code: String,
}

/// One row of the aggregated expense report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: EntityKey,
    pub total_expenses: Money,
    pub record_count: u64,
}
