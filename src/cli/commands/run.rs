//! Run command implementation for the ANS processor CLI
//!
//! This module contains the complete pipeline workflow: configuration
//! loading, archive extraction, per-file decoding and schema mapping,
//! record validation, registry enrichment, aggregation, and report output.

use super::shared::{
    RunSummary, create_progress_bar, discover_statement_files, is_critical_error,
    load_configuration, setup_logging,
};
use crate::app::models::ValidationOutcome;
use crate::app::services::aggregator::Aggregator;
use crate::app::services::archive::{ExtractionStats, discover_archives, extract_archive};
use crate::app::services::encoding::{MojibakeRepairer, TextDecoder};
use crate::app::services::enricher::{Enricher, EnrichmentStats};
use crate::app::services::entity_registry::EntityRegistry;
use crate::app::services::report_writer::{
    EnrichedExportWriter, RejectsWriter, package_outputs, write_aggregate_report,
};
use crate::app::services::schema_mapper::{MapStats, SchemaMapper};
use crate::app::services::validator::Validator;
use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::Config;
use crate::{Error, Result};
use indicatif::HumanDuration;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Run command runner for the ANS processor
///
/// This function orchestrates the entire pipeline:
/// 1. Set up logging and configuration
/// 2. Load the operator registry
/// 3. Extract archives and discover statement files
/// 4. Decode, map, validate, enrich, and aggregate every record
/// 5. Write reports and the final summary
pub async fn run_pipeline(args: RunArgs, cancel: CancellationToken) -> Result<RunSummary> {
    let start_time = Instant::now();

    // Set up logging
    setup_logging(args.get_log_level(), args.quiet);

    info!("Starting ANS processor");
    debug!("Command line arguments: {:?}", args);

    // Validate arguments
    args.validate()?;

    // Load configuration with layered approach
    let config = load_configuration(&args).await?;
    debug!("Loaded configuration: {:?}", config);

    if config.processing.dry_run {
        return run_dry_run(&config).await;
    }

    config.ensure_output_directory()?;

    // Load the operator registry before touching any statement file
    let decoder = TextDecoder::new(config.encoding.candidates.clone());
    let repairer = MojibakeRepairer::new(config.encoding.mojibake.clone());
    let registry_path = config.registry_path();
    info!("Loading operator registry from {}", registry_path.display());
    let (registry, registry_stats) =
        EntityRegistry::load(&registry_path, &decoder, &repairer).await?;
    info!(
        "Operator registry loaded: {} entries ({}) in {:.2}s",
        registry_stats.entries_loaded,
        registry_stats.encoding_used,
        registry_stats.load_duration.as_secs_f64()
    );

    // Extract archives and gather the full input file set
    let mut extraction = ExtractionStats::default();
    let mut files = discover_statement_files(&config.processing.input_path)?;
    if config.processing.extract_archives {
        let archives = discover_archives(&config.processing.input_path)?;
        info!("Discovered {} archives to extract", archives.len());
        for archive in &archives {
            check_cancelled(&cancel)?;
            let (extracted, stats) = extract_archive(archive, &config.extraction_root())?;
            extraction.merge(&stats);
            files.extend(extracted);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::no_readable_input(
            config.processing.input_path.display().to_string(),
        ));
    }
    info!("Processing {} statement files", files.len());

    let summary = process_files(
        &config,
        &args,
        files,
        Arc::new(registry),
        &decoder,
        &repairer,
        extraction,
        &cancel,
        start_time,
    )
    .await?;

    // Generate final report
    generate_final_report(&args, &summary)?;

    Ok(summary)
}

fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::processing_interrupted("Cancellation requested"));
    }
    Ok(())
}

/// Perform a dry run showing what would be processed
async fn run_dry_run(config: &Config) -> Result<RunSummary> {
    info!("Performing dry run - no files will be created");

    let files = discover_statement_files(&config.processing.input_path)?;
    let archives = if config.processing.extract_archives {
        discover_archives(&config.processing.input_path)?
    } else {
        Vec::new()
    };

    for file in &files {
        info!("Would process: {}", file.display());
    }
    for archive in &archives {
        info!("Would extract: {}", archive.display());
    }
    info!(
        "Dry run complete: {} statement files, {} archives",
        files.len(),
        archives.len()
    );

    Ok(RunSummary {
        finished_at: chrono::Utc::now(),
        files_discovered: files.len() + archives.len(),
        ..Default::default()
    })
}

/// The record-level pipeline over an already-discovered file set
#[allow(clippy::too_many_arguments)]
async fn process_files(
    config: &Config,
    args: &RunArgs,
    files: Vec<PathBuf>,
    registry: Arc<EntityRegistry>,
    decoder: &TextDecoder,
    repairer: &MojibakeRepairer,
    extraction: ExtractionStats,
    cancel: &CancellationToken,
    start_time: Instant,
) -> Result<RunSummary> {
    let mapper = SchemaMapper::new(config.schema.clone());
    let mut validator = Validator::new(&config.validation);
    let enricher = Enricher::new(registry.clone(), &config.enrichment);
    let mut aggregator = Aggregator::new(&config.aggregation);
    let mut enrichment_stats = EnrichmentStats::new();
    let mut mapping = MapStats::new();

    let mut enriched_writer =
        EnrichedExportWriter::create(config.enriched_output_path(), &config.output)?;
    let mut rejects_writer = if config.output.write_rejects {
        Some(RejectsWriter::create(
            config.rejects_output_path(),
            &config.output,
        )?)
    } else {
        None
    };

    // Set up progress bar for file processing
    let progress_bar = if args.show_progress() {
        Some(create_progress_bar(
            files.len() as u64,
            "Processing statement files...",
        ))
    } else {
        None
    };

    let mut files_processed = 0usize;
    let mut files_skipped = 0usize;

    for file in &files {
        check_cancelled(cancel)?;

        if let Some(pb) = &progress_bar {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("unknown");
            pb.set_message(format!("Processing {}", file_name));
        }

        match process_one_file(
            file,
            decoder,
            repairer,
            &mapper,
            &mut validator,
            &enricher,
            &mut aggregator,
            &mut enrichment_stats,
            &mut enriched_writer,
            rejects_writer.as_mut(),
        )
        .await
        {
            Ok(file_stats) => {
                files_processed += 1;
                mapping.merge(&file_stats);
                debug!(
                    "Processed {}: {} rows, {} records mapped",
                    file.display(),
                    file_stats.rows_read,
                    file_stats.records_mapped
                );
            }
            Err(e) => {
                if is_critical_error(&e) {
                    return Err(e);
                }
                // Unreadable file: log, count, keep going
                error!("Skipping {}: {}", file.display(), e);
                files_skipped += 1;
            }
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message(format!("Processed {} files", files_processed));
    }

    // Finish outputs
    let mut output_sizes = Vec::new();
    let (_, enriched_size) = enriched_writer.finish()?;
    output_sizes.push((config.output.enriched_filename.clone(), enriched_size));

    let (rows, aggregation) = aggregator.finish()?;
    let report_size = write_aggregate_report(&config.report_output_path(), &config.output, &rows)?;
    output_sizes.push((config.output.report_filename.clone(), report_size));

    if let Some(writer) = rejects_writer {
        let (_, rejects_size) = writer.finish()?;
        output_sizes.push((config.output.rejects_filename.clone(), rejects_size));
    }

    if config.output.package_outputs {
        let outputs: Vec<PathBuf> = vec![
            config.enriched_output_path(),
            config.report_output_path(),
            config.rejects_output_path(),
        ];
        let package_size = package_outputs(&config.package_output_path(), &outputs)?;
        output_sizes.push((config.output.package_filename.clone(), package_size));
    }

    let validation = validator.stats().clone();
    if files_processed > 0 && validation.records_seen == 0 {
        warn!("No records were mapped from any input file");
    }

    Ok(RunSummary {
        finished_at: chrono::Utc::now(),
        files_discovered: files.len(),
        files_processed,
        files_skipped,
        extraction,
        mapping,
        validation,
        enrichment: enrichment_stats,
        aggregation,
        registry_entries: registry.len(),
        processing_time: start_time.elapsed(),
        output_sizes,
    })
}

/// Decode, map, validate, enrich, and aggregate one statement file
#[allow(clippy::too_many_arguments)]
async fn process_one_file(
    file: &std::path::Path,
    decoder: &TextDecoder,
    repairer: &MojibakeRepairer,
    mapper: &SchemaMapper,
    validator: &mut Validator,
    enricher: &Enricher,
    aggregator: &mut Aggregator,
    enrichment_stats: &mut EnrichmentStats,
    enriched_writer: &mut EnrichedExportWriter,
    mut rejects_writer: Option<&mut RejectsWriter>,
) -> Result<MapStats> {
    let bytes = tokio::fs::read(file).await?;
    let label = file.display().to_string();
    let decoded = decoder.decode(&bytes, &label)?;
    let text = repairer.repair(&decoded.text);
    debug!("Decoded {} as {}", label, decoded.encoding_used);

    let result = mapper.map_file(file, &text)?;
    for record in result.records {
        match validator.validate(&record) {
            ValidationOutcome::Accepted { amount } => {
                let enriched = enricher.enrich(record, amount, enrichment_stats);
                aggregator.add(enriched.entity_key(), enriched.amount)?;
                enriched_writer.write(&enriched)?;
            }
            ValidationOutcome::Rejected { reason } => {
                if let Some(writer) = rejects_writer.as_deref_mut() {
                    writer.write(&record, reason)?;
                }
            }
        }
    }
    Ok(result.stats)
}

/// Generate the final run report
fn generate_final_report(args: &RunArgs, summary: &RunSummary) -> Result<()> {
    info!("Generating final report");

    match args.output_format {
        OutputFormat::Human => generate_human_report(summary),
        OutputFormat::Json => generate_json_report(summary),
        OutputFormat::Csv => generate_csv_report(summary),
    }
}

/// Generate human-readable report
fn generate_human_report(summary: &RunSummary) -> Result<()> {
    let duration = HumanDuration(summary.processing_time);
    let total_size = RunSummary::format_size(summary.total_output_size());

    println!("\nANS Processing Complete");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Processing Summary:");
    println!(
        "   • Files processed: {} of {} discovered",
        summary.files_processed, summary.files_discovered
    );
    if summary.files_skipped > 0 {
        println!("   • Files skipped as unreadable: {}", summary.files_skipped);
    }
    println!("   • Rows read: {}", summary.mapping.rows_read);
    println!("   • Records accepted: {}", summary.validation.accepted);
    println!(
        "   • Records rejected: {}",
        summary.validation.rejected_total()
    );
    println!(
        "   • Registry matches: {} exact, {} fuzzy, {} unmatched",
        summary.enrichment.exact_matches,
        summary.enrichment.fuzzy_matches,
        summary.enrichment.unmatched
    );
    println!("   • Aggregate groups: {}", summary.aggregation.groups);
    println!("   • Total output size: {}", total_size);
    println!("   • Processing time: {}", duration);

    if !summary.output_sizes.is_empty() {
        println!("\nOutput Files:");
        for (filename, size) in &summary.output_sizes {
            println!("   • {}: {}", filename, RunSummary::format_size(*size));
        }
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(summary: &RunSummary) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(summary)
            .map_err(|e| Error::aggregation(format!("Summary serialization failed: {e}")))?
    );
    Ok(())
}

/// Generate CSV report for data analysis
fn generate_csv_report(summary: &RunSummary) -> Result<()> {
    println!("metric,value");
    println!("files_discovered,{}", summary.files_discovered);
    println!("files_processed,{}", summary.files_processed);
    println!("files_skipped,{}", summary.files_skipped);
    println!("rows_read,{}", summary.mapping.rows_read);
    println!("records_accepted,{}", summary.validation.accepted);
    println!("records_rejected,{}", summary.validation.rejected_total());
    println!("exact_matches,{}", summary.enrichment.exact_matches);
    println!("fuzzy_matches,{}", summary.enrichment.fuzzy_matches);
    println!("unmatched,{}", summary.enrichment.unmatched);
    println!("aggregate_groups,{}", summary.aggregation.groups);
    println!(
        "processing_time_seconds,{}",
        summary.processing_time.as_secs_f64()
    );
    println!("total_output_size_bytes,{}", summary.total_output_size());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_dry_run_counts_inputs() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("1T2025.csv"), "a;b\n").unwrap();

        let config = Config::new(
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("output"),
        );
        let summary = run_dry_run(&config).await.unwrap();
        assert_eq!(summary.files_discovered, 1);
        assert!(!temp_dir.path().join("output").exists());
    }

    #[test]
    fn test_generate_human_report() {
        let summary = RunSummary {
            files_discovered: 3,
            files_processed: 3,
            processing_time: std::time::Duration::from_secs(2),
            output_sizes: vec![("despesas_agregadas.csv".to_string(), 1024)],
            ..Default::default()
        };
        assert!(generate_human_report(&summary).is_ok());
    }

    #[test]
    fn test_generate_json_report() {
        let summary = RunSummary::default();
        assert!(generate_json_report(&summary).is_ok());
    }

    #[test]
    fn test_generate_csv_report() {
        let summary = RunSummary::default();
        assert!(generate_csv_report(&summary).is_ok());
    }
}
