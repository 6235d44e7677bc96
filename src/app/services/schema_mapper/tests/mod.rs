//! Tests for the schema mapping service

pub mod delimiter_tests;
pub mod mapper_tests;

use crate::config::SchemaConfig;

/// Default mapper configuration for tests
pub fn default_schema() -> SchemaConfig {
    SchemaConfig::default()
}
