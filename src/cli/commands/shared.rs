//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::services::aggregator::AggregationStats;
use crate::app::services::archive::ExtractionStats;
use crate::app::services::enricher::EnrichmentStats;
use crate::app::services::schema_mapper::MapStats;
use crate::app::services::validator::ValidationStats;
use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::constants::{PROGRESS_TEMPLATE, REGISTRY_FILENAME, is_tabular_extension};
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Run statistics for reporting across all commands
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunSummary {
    /// When the run finished
    pub finished_at: chrono::DateTime<chrono::Utc>,
    /// Number of input files discovered (after extraction)
    pub files_discovered: usize,
    /// Number of input files fully processed
    pub files_processed: usize,
    /// Number of input files skipped as unreadable
    pub files_skipped: usize,
    /// Archive extraction metrics
    pub extraction: ExtractionStats,
    /// Schema mapping metrics across all files
    pub mapping: MapStats,
    /// Validation metrics across all files
    pub validation: ValidationStats,
    /// Enrichment metrics across all files
    pub enrichment: EnrichmentStats,
    /// Aggregation metrics
    pub aggregation: AggregationStats,
    /// Registry entries available for enrichment
    pub registry_entries: usize,
    /// Total processing time
    #[serde(serialize_with = "serialize_duration_secs")]
    pub processing_time: std::time::Duration,
    /// Output file sizes in bytes
    pub output_sizes: Vec<(String, u64)>,
}

fn serialize_duration_secs<S: serde::Serializer>(
    duration: &std::time::Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl RunSummary {
    /// Calculate total output size in bytes
    pub fn total_output_size(&self) -> u64 {
        self.output_sizes.iter().map(|(_, size)| size).sum()
    }

    /// Format output size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging shared by every command
///
/// Uses `try_init` so repeated initialization (test harnesses, nested
/// invocations) is a no-op instead of a panic.
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ans_processor={}", log_level)));

    let result = if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Load configuration using layered approach (file -> defaults -> args)
pub async fn load_configuration(args: &RunArgs) -> Result<Config> {
    info!("Loading configuration");

    // Determine config file path
    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => {
            // Try default config file location
            default_config_path
                .as_ref()
                .filter(|path| path.exists())
                .map(|path| path.as_path())
        }
    };

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults");
    }

    // Load with layered configuration
    let mut config = Config::load_layered(
        args.input_path.clone(),
        args.output_path.clone(),
        config_file,
    )?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &RunArgs) {
    // Override path settings if explicitly provided
    if let Some(input_path) = &args.input_path {
        config.processing.input_path = input_path.clone();
    }
    if let Some(output_path) = &args.output_path {
        config.processing.output_path = output_path.clone();
    }
    if let Some(registry_path) = &args.registry_path {
        config.processing.registry_path = Some(registry_path.clone());
    }

    // Override processing settings
    config.processing.dry_run = args.dry_run;

    // Override output settings; flags only widen what gets written
    if args.write_rejects {
        config.output.write_rejects = true;
    }
    if args.package {
        config.output.package_outputs = true;
    }
    if args.include_bom {
        config.output.include_bom = true;
    }

    // Override logging settings
    config.logging.level = args.get_log_level().to_string();
    config.logging.structured = !args.quiet;
}

/// Discover loose statement files under the input path
///
/// Walks recursively, keeps tabular extensions, excludes the operator
/// registry CSV, and sorts for a deterministic processing order.
pub fn discover_statement_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(input_path).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to walk {}", input_path.display()), e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let tabular = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_tabular_extension);
        if !tabular {
            continue;
        }
        // The registry is enrichment input, not statement data
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(REGISTRY_FILENAME))
        {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    debug!(
        "Discovered {} statement files in {}",
        files.len(),
        input_path.display()
    );
    Ok(files)
}

/// Check if an error is critical enough to stop processing
///
/// Per-file input problems (encoding, parsing, schema) skip the file;
/// anything touching the run-wide outputs or the aggregate state stops
/// the run, since a partially ingested file cannot be rolled back.
pub fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. }
            | Error::RegistryLoad { .. }
            | Error::NoReadableInput { .. }
            | Error::OutputWrite { .. }
            | Error::Aggregation { .. }
            | Error::ProcessingInterrupted { .. }
    )
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
