//! Registry command implementation for the ANS processor CLI
//!
//! Inspection utility for the operator registry: summary statistics by
//! default, or a name search with `--search`.

use super::shared::setup_logging;
use crate::app::services::encoding::{MojibakeRepairer, TextDecoder};
use crate::app::services::entity_registry::{EntityRegistry, RegistryEntry};
use crate::cli::args::{OutputFormat, RegistryArgs};
use crate::config::Config;
use crate::Result;
use colored::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Registry command runner
pub async fn run_registry(args: RegistryArgs) -> Result<usize> {
    setup_logging(args.get_log_level(), false);

    info!("Inspecting operator registry");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = Config::default();
    let decoder = TextDecoder::new(config.encoding.candidates.clone());
    let repairer = MojibakeRepairer::new(config.encoding.mojibake.clone());
    let (registry, load_stats) =
        EntityRegistry::load(&args.registry_path, &decoder, &repairer).await?;
    info!(
        "Registry loaded: {} entries ({})",
        load_stats.entries_loaded, load_stats.encoding_used
    );

    match &args.search {
        Some(term) => {
            let matches = registry.search(term);
            print_search_results(term, &matches, &args.output_format)?;
            Ok(matches.len())
        }
        None => {
            print_registry_summary(&registry, &args.output_format)?;
            Ok(registry.len())
        }
    }
}

fn print_search_results(
    term: &str,
    matches: &[&RegistryEntry],
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if matches.is_empty() {
                println!("{}", format!("No operators matching '{}'", term).yellow());
                return Ok(());
            }
            println!(
                "{}",
                format!("{} operators matching '{}':", matches.len(), term).bold()
            );
            for entry in matches {
                let state = entry.state.as_deref().unwrap_or("--");
                let trade = entry
                    .trade_name
                    .as_deref()
                    .map(|t| format!(" ({})", t))
                    .unwrap_or_default();
                println!(
                    "   {} {} [{}]{}",
                    entry.registry_id.green(),
                    entry.legal_name,
                    state,
                    trade.dimmed()
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = matches
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "registry_id": e.registry_id,
                        "legal_name": e.legal_name,
                        "trade_name": e.trade_name,
                        "state": e.state,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        }
        OutputFormat::Csv => {
            println!("registry_id,legal_name,trade_name,state");
            for entry in matches {
                println!(
                    "{},{},{},{}",
                    entry.registry_id,
                    entry.legal_name,
                    entry.trade_name.as_deref().unwrap_or(""),
                    entry.state.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}

fn print_registry_summary(registry: &EntityRegistry, format: &OutputFormat) -> Result<()> {
    let mut by_state: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in registry.entries() {
        *by_state.entry(entry.state.as_deref().unwrap_or("--")).or_default() += 1;
    }

    match format {
        OutputFormat::Human => {
            println!("{}", "Operator Registry Summary".bold());
            println!("   • Total operators: {}", registry.len());
            println!("   • States represented: {}", by_state.len());
            println!("\nOperators by state:");
            for (state, count) in &by_state {
                println!("   {} {}", state.cyan(), count);
            }
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "total_operators": registry.len(),
                "by_state": by_state,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).unwrap_or_default()
            );
        }
        OutputFormat::Csv => {
            println!("state,operators");
            for (state, count) in &by_state {
                println!("{},{}", state, count);
            }
        }
    }
    Ok(())
}
