//! Record validation for the ANS pipeline
//!
//! Classifies every canonical record as accepted or rejected under a fixed,
//! short-circuiting rule order: missing entity, invalid state, invalid
//! period, negative or non-numeric amount, duplicate record. The first
//! failing rule names the rejection; no rejection is fatal to the run.
//!
//! - [`validator`] - the rule chain and the run-scoped duplicate set
//! - [`stats`] - per-reason rejection counters
//!
//! Duplicate detection is state owned by the [`Validator`] instance, so a
//! fresh validator per run (never module-level state) gives each run an
//! independent view.

pub mod stats;
pub mod validator;

#[cfg(test)]
pub mod tests;

pub use stats::ValidationStats;
pub use validator::Validator;
