//! Command implementations for the ANS processor CLI
//!
//! This module contains the main command execution logic, progress
//! reporting, and error handling for the CLI interface. Each command is
//! implemented in its own module for better organization.

pub mod fetch;
pub mod registry;
pub mod run;
pub mod shared;

// Re-export the main types and functions
pub use run::run_pipeline;
pub use shared::RunSummary;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Main command runner for the ANS processor
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `run`: the full statement processing pipeline
/// - `fetch`: download the latest archives and registry
/// - `registry`: operator registry inspection
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    match args.get_command() {
        Commands::Run(run_args) => {
            run::run_pipeline(run_args, cancel).await?;
        }
        Commands::Fetch(fetch_args) => {
            fetch::run_fetch(fetch_args, cancel).await?;
        }
        Commands::Registry(registry_args) => {
            registry::run_registry(registry_args).await?;
        }
    }
    Ok(())
}
