//! ANS Processor Library
//!
//! A Rust library for turning ANS quarterly accounting statement archives
//! into validated, enriched and aggregated expense reports.
//!
//! This library provides tools for:
//! - Decoding government CSV exports with mixed encodings and mojibake repair
//! - Mapping heterogeneous column vocabularies onto one canonical record shape
//! - Validating records with an ordered rule set and run-scoped deduplication
//! - Enriching records against the active-operator registry (exact and fuzzy)
//! - Aggregating expenses per entity with exact fixed-point arithmetic
//! - Comprehensive error handling and recovery

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod archive;
        pub mod encoding;
        pub mod enricher;
        pub mod entity_registry;
        pub mod fetcher;
        pub mod report_writer;
        pub mod schema_mapper;
        pub mod validator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AggregateRow, CanonicalRecord, EnrichedRecord, Money, RejectReason};
pub use config::Config;

/// Result type alias for the ANS processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for ANS processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No configured encoding could decode the file
    #[error("Encoding error in file '{file}': {message}")]
    Encoding { file: String, message: String },

    /// File-level schema mapping failure (no recognizable header row)
    #[error("Schema mapping error in file '{file}': {message}")]
    SchemaMapping { file: String, message: String },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Entity registry failed to load
    #[error("Registry load error for '{path}': {message}")]
    RegistryLoad { path: String, message: String },

    /// No readable input files were found
    #[error("No readable input files found under '{path}'")]
    NoReadableInput { path: String },

    /// Aggregation failure (overflow, spill corruption)
    #[error("Aggregation error: {message}")]
    Aggregation { message: String },

    /// Network operation failed
    #[error("Network error for '{url}': {message}")]
    Network {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// ZIP archive extraction failed
    #[error("Archive error in '{file}': {message}")]
    ArchiveExtraction {
        file: String,
        message: String,
        #[source]
        source: Option<zip::result::ZipError>,
    },

    /// Output file writing failed
    #[error("Output write error for '{path}': {message}")]
    OutputWrite { path: String, message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an encoding error for a file
    pub fn encoding(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a file-level schema mapping error
    pub fn schema_mapping(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaMapping {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a registry load error
    pub fn registry_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistryLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a no-readable-input error
    pub fn no_readable_input(path: impl Into<String>) -> Self {
        Self::NoReadableInput { path: path.into() }
    }

    /// Create an aggregation error
    pub fn aggregation(message: impl Into<String>) -> Self {
        Self::Aggregation {
            message: message.into(),
        }
    }

    /// Create a network error with context
    pub fn network(
        url: impl Into<String>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an archive extraction error
    pub fn archive_extraction(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<zip::result::ZipError>,
    ) -> Self {
        Self::ArchiveExtraction {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an output write error
    pub fn output_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutputWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        Self::ArchiveExtraction {
            file: "unknown".to_string(),
            message: "Archive operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Aggregation {
            message: format!("Spill record serialization failed: {}", error),
        }
    }
}
