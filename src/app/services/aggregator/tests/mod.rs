//! Aggregation test suite

pub mod aggregator_tests;
pub mod backend_tests;

use crate::app::models::{EntityKey, Money};
use std::str::FromStr;

pub fn key(legal_name: &str, state: &str) -> EntityKey {
    EntityKey {
        legal_name: legal_name.to_string(),
        state_code: state.to_string(),
    }
}

pub fn money(text: &str) -> Money {
    Money::from_str(text).unwrap()
}
