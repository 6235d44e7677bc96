//! Command-line argument definitions for the ANS expense processor
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the ANS expense processor
///
/// Processes quarterly accounting statements published by the Brazilian
/// health-insurance regulator (ANS) from raw CSV/ZIP inputs into a
/// validated enriched export and an aggregated per-operator expense report.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ans-processor",
    version,
    about = "Process ANS quarterly accounting statements into enriched and aggregated expense reports",
    long_about = "A production-ready tool that ingests the quarterly accounting statement CSVs \
                  published by the Brazilian health-insurance regulator (ANS), normalizes their \
                  inconsistent encodings and layouts, validates every expense record, enriches \
                  records against the active-operator registry, and produces a deterministic \
                  per-operator aggregated expense report."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the ANS processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process statement files into enriched and aggregated outputs (default command)
    Run(RunArgs),
    /// Download the latest statement archives and operator registry
    Fetch(FetchArgs),
    /// Inspect the operator registry
    Registry(RegistryArgs),
}

/// Arguments for the run command (main pipeline)
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Input path containing statement CSV files and/or ZIP archives
    ///
    /// Scanned recursively. ZIP archives are extracted automatically and
    /// their tabular entries processed alongside loose CSV files.
    /// If not specified, defaults to ./data/raw
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Input path containing statement CSVs and/or ZIP archives"
    )]
    pub input_path: Option<PathBuf>,

    /// Output path for generated reports
    ///
    /// Will be created if it doesn't exist. Generated files are the
    /// enriched record export, the aggregated expense report, and
    /// optionally the rejected-record export.
    /// If not specified, defaults to ./data/output
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output path for generated reports"
    )]
    pub output_path: Option<PathBuf>,

    /// Path to the operator registry CSV
    ///
    /// The active-operator registry (Relatorio_cadop.csv) used for
    /// enrichment. If not specified, the registry is looked up inside the
    /// input path.
    #[arg(
        short = 'r',
        long = "registry",
        value_name = "FILE",
        help = "Path to the operator registry CSV"
    )]
    pub registry_path: Option<PathBuf>,

    /// Also export rejected records with their rejection reasons
    #[arg(long = "write-rejects", help = "Export rejected records with reasons")]
    pub write_rejects: bool,

    /// Package the output files into a single ZIP archive
    #[arg(long = "package", help = "Package output files into a ZIP archive")]
    pub package: bool,

    /// Prefix outputs with a UTF-8 BOM for Excel compatibility
    #[arg(long = "bom", help = "Prefix output files with a UTF-8 BOM")]
    pub include_bom: bool,

    /// Perform a dry run without writing any output files
    ///
    /// Discovers and decodes the inputs, reports what would be processed,
    /// and exits without producing outputs.
    #[arg(
        long = "dry-run",
        help = "Show what would be processed without writing output files"
    )]
    pub dry_run: bool,

    /// Path to configuration file
    ///
    /// JSON configuration file for advanced settings. If not specified,
    /// looks for ~/.config/ans_processor/config.json
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the fetch command (remote acquisition)
#[derive(Debug, Clone, Parser)]
pub struct FetchArgs {
    /// Destination directory for downloaded files
    ///
    /// Will be created if it doesn't exist.
    /// If not specified, defaults to ./input
    #[arg(
        short = 'd',
        long = "dest",
        value_name = "PATH",
        help = "Destination directory for downloaded files"
    )]
    pub dest_path: Option<PathBuf>,

    /// Maximum number of newest archives to download
    #[arg(
        short = 'n',
        long = "max-archives",
        value_name = "COUNT",
        help = "Maximum number of newest archives to download"
    )]
    pub max_archives: Option<usize>,

    /// Skip downloading the operator registry
    #[arg(long = "no-registry", help = "Skip downloading the operator registry")]
    pub no_registry: bool,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the registry command (registry inspection)
#[derive(Debug, Clone, Parser)]
pub struct RegistryArgs {
    /// Path to the operator registry CSV
    #[arg(
        short = 'r',
        long = "registry",
        value_name = "FILE",
        help = "Path to the operator registry CSV"
    )]
    pub registry_path: PathBuf,

    /// Search the registry by operator name
    ///
    /// If not specified, prints registry summary statistics instead.
    #[arg(
        short = 's',
        long = "search",
        value_name = "NAME",
        help = "Search the registry by operator name"
    )]
    pub search: Option<String>,

    /// Output format for registry results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for registry results"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl RunArgs {
    /// Validate the run command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        // Validate input path exists (only if explicitly provided)
        if let Some(input_path) = &self.input_path {
            if !input_path.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input_path.display()
                )));
            }

            if !input_path.is_dir() {
                return Err(Error::configuration(format!(
                    "Input path is not a directory: {}",
                    input_path.display()
                )));
            }
        }

        // Validate registry file exists if specified
        if let Some(registry_path) = &self.registry_path {
            if !registry_path.is_file() {
                return Err(Error::configuration(format!(
                    "Registry file does not exist: {}",
                    registry_path.display()
                )));
            }
        }

        // Validate config file exists if specified
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl FetchArgs {
    /// Validate the fetch command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(max_archives) = self.max_archives {
            if max_archives == 0 {
                return Err(Error::configuration(
                    "Maximum archive count must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

impl RegistryArgs {
    /// Validate the registry command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.registry_path.is_file() {
            return Err(Error::configuration(format!(
                "Registry file does not exist: {}",
                self.registry_path.display()
            )));
        }

        if let Some(search) = &self.search {
            if search.trim().is_empty() {
                return Err(Error::configuration(
                    "Search term cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            registry_path: None,
            write_rejects: false,
            package: false,
            include_bom: false,
            dry_run: false,
            config_file: None,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            dest_path: None,
            max_archives: None,
            no_registry: false,
            config_file: None,
            verbose: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path().to_path_buf();

        let args = RunArgs {
            input_path: Some(temp_path.clone()),
            output_path: Some(temp_path.join("output")),
            ..RunArgs::default()
        };
        assert!(args.validate().is_ok());

        // Nonexistent input path
        let mut invalid_args = args.clone();
        invalid_args.input_path = Some(PathBuf::from("/nonexistent/path"));
        assert!(invalid_args.validate().is_err());

        // Nonexistent registry file
        let mut invalid_args = args.clone();
        invalid_args.registry_path = Some(temp_path.join("missing.csv"));
        assert!(invalid_args.validate().is_err());

        // Nonexistent config file
        let mut invalid_args = args;
        invalid_args.config_file = Some(temp_path.join("missing.toml"));
        assert!(invalid_args.validate().is_err());
    }

    #[test]
    fn test_run_log_level() {
        let mut args = RunArgs::default();

        // Default level
        assert_eq!(args.get_log_level(), "warn");

        // Verbose levels
        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        // Quiet mode
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_show_progress() {
        let mut args = RunArgs::default();
        assert!(args.show_progress());

        args.quiet = true;
        assert!(!args.show_progress());
    }

    #[test]
    fn test_fetch_args_validation() {
        let args = FetchArgs::default();
        assert!(args.validate().is_ok());

        let mut invalid_args = args;
        invalid_args.max_archives = Some(0);
        assert!(invalid_args.validate().is_err());
    }

    #[test]
    fn test_registry_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let registry = temp_dir.path().join("Relatorio_cadop.csv");
        std::fs::write(&registry, "Registro_ANS;Razao_Social\n").unwrap();

        let args = RegistryArgs {
            registry_path: registry.clone(),
            search: None,
            output_format: OutputFormat::Human,
            verbose: 0,
        };
        assert!(args.validate().is_ok());

        let invalid_args = RegistryArgs {
            registry_path: temp_dir.path().join("missing.csv"),
            search: None,
            output_format: OutputFormat::Human,
            verbose: 0,
        };
        assert!(invalid_args.validate().is_err());

        let invalid_args = RegistryArgs {
            registry_path: registry,
            search: Some("   ".to_string()),
            output_format: OutputFormat::Human,
            verbose: 0,
        };
        assert!(invalid_args.validate().is_err());
    }
}
