//! Fetch command implementation for the ANS processor CLI

use super::shared::setup_logging;
use crate::app::services::fetcher::{FetchStats, Fetcher};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Fetch command runner
///
/// Downloads the newest quarterly statement archives and, unless disabled,
/// the active-operator registry into the destination directory.
pub async fn run_fetch(args: FetchArgs, cancel: CancellationToken) -> Result<FetchStats> {
    setup_logging(args.get_log_level(), args.quiet);

    info!("Starting fetch");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    // Fetch settings come from the config file with CLI overrides on top
    let config = Config::load_layered(None, None, args.config_file.as_deref())?;
    let mut fetch_config = config.fetch.clone();
    if let Some(max_archives) = args.max_archives {
        fetch_config.max_archives = max_archives;
    }

    let dest = args
        .dest_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("input"));
    info!(
        "Fetching up to {} archives into {}",
        fetch_config.max_archives,
        dest.display()
    );

    let fetcher = Fetcher::new(&fetch_config)?;
    let stats = tokio::select! {
        result = fetcher.fetch_latest(&dest, !args.no_registry) => result?,
        _ = cancel.cancelled() => {
            return Err(Error::processing_interrupted("Fetch cancelled"));
        }
    };

    if !args.quiet {
        println!(
            "Fetched {} archives ({} already present){}",
            stats.archives_downloaded,
            stats.archives_skipped,
            if stats.registry_downloaded {
                ", registry updated"
            } else {
                ""
            }
        );
    }

    Ok(stats)
}
