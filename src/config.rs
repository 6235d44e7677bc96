//! Configuration management and validation.
//!
//! Provides the layered configuration for a pipeline run: filesystem layout,
//! encoding candidates and the mojibake repair table, the column alias
//! vocabulary, validation rules, enrichment and aggregation policy, fetch
//! endpoints and output formatting. Defaults live in `constants`; a JSON
//! config file and CLI arguments override them layer by layer.

use crate::constants;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for ANS processing
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub encoding: EncodingConfig,
    pub schema: SchemaConfig,
    pub validation: ValidationConfig,
    pub enrichment: EnrichmentConfig,
    pub aggregation: AggregationConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Filesystem layout and run mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory containing source archives and/or loose tabular files
    pub input_path: PathBuf,

    /// Directory receiving outputs and the extraction work area
    pub output_path: PathBuf,

    /// Registry CSV location; defaults to `<input_path>/Relatorio_cadop.csv`
    pub registry_path: Option<PathBuf>,

    /// Extract ZIP archives found in the input directory before mapping
    pub extract_archives: bool,

    /// Report what would be processed without writing anything
    pub dry_run: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/raw"),
            output_path: PathBuf::from("data/output"),
            registry_path: None,
            extract_archives: true,
            dry_run: false,
        }
    }
}

/// Ordered encoding candidates and the mojibake repair table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Candidate encodings tried in order; first successful decode wins
    pub candidates: Vec<String>,

    /// Versioned repair table for double-encoded text
    pub mojibake: MojibakeTable,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            candidates: constants::DEFAULT_ENCODING_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            mojibake: MojibakeTable::default(),
        }
    }
}

/// Mojibake repair table
///
/// The table is versioned configuration: tests pin the shipped default, and
/// deployments can replace it wholesale through the config file without a
/// code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MojibakeTable {
    pub version: String,
    pub markers: Vec<String>,
    pub replacements: Vec<(String, String)>,
}

impl Default for MojibakeTable {
    fn default() -> Self {
        Self {
            version: constants::mojibake::TABLE_VERSION.to_string(),
            markers: constants::mojibake::MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            replacements: constants::mojibake::REPLACEMENTS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

/// Column vocabulary and delimiter detection for the schema mapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Candidate cell delimiters, preferred in order on ties
    pub delimiter_candidates: Vec<char>,

    /// Accepted historical names per canonical column
    pub aliases: ColumnAliases,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            delimiter_candidates: constants::DEFAULT_DELIMITER_CANDIDATES.to_vec(),
            aliases: ColumnAliases::default(),
        }
    }
}

/// Accepted header spellings for each canonical record field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub entity_name: Vec<String>,
    pub state_code: Vec<String>,
    pub year: Vec<String>,
    pub quarter: Vec<String>,
    pub expense_amount: Vec<String>,
    pub account_code: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            entity_name: owned(constants::aliases::ENTITY_NAME),
            state_code: owned(constants::aliases::STATE_CODE),
            year: owned(constants::aliases::YEAR),
            quarter: owned(constants::aliases::QUARTER),
            expense_amount: owned(constants::aliases::EXPENSE_AMOUNT),
            account_code: owned(constants::aliases::ACCOUNT_CODE),
        }
    }
}

/// Validation rule parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Recognized 2-letter state codes
    pub state_codes: Vec<String>,

    /// Plausible report year range, inclusive
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            state_codes: owned(constants::BRAZILIAN_STATE_CODES),
            min_year: constants::DEFAULT_MIN_YEAR,
            max_year: constants::DEFAULT_MAX_YEAR,
        }
    }
}

/// Enrichment join policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Fall back to token-sorted fuzzy matching when exact match misses
    pub fuzzy_matching: bool,

    /// Registry id assigned to records with no registry match
    pub unmatched_registry_id: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            fuzzy_matching: true,
            unmatched_registry_id: constants::UNMATCHED_REGISTRY_ID.to_string(),
        }
    }
}

/// Aggregation backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Distinct-group count above which aggregation spills to disk
    pub group_memory_limit: usize,

    /// Hash partition count used by the spill backend
    pub spill_partitions: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            group_memory_limit: constants::DEFAULT_GROUP_MEMORY_LIMIT,
            spill_partitions: constants::SPILL_PARTITIONS,
        }
    }
}

/// Fetch endpoints and download policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Static directory listing of quarterly statement archives
    pub base_url: String,

    /// Active-operator registry CSV URL
    pub registry_url: String,

    /// Newest archives downloaded per fetch
    pub max_archives: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: constants::network::STATEMENTS_BASE_URL.to_string(),
            registry_url: constants::network::REGISTRY_URL.to_string(),
            max_archives: constants::network::DEFAULT_MAX_ARCHIVES,
            timeout_secs: constants::network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Output file naming and formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output CSV delimiter
    pub delimiter: char,

    /// Prefix outputs with a UTF-8 BOM for Excel compatibility
    pub include_bom: bool,

    /// Also export rejected records with their reasons
    pub write_rejects: bool,

    /// Package the output files into a ZIP archive after the run
    pub package_outputs: bool,

    pub enriched_filename: String,
    pub report_filename: String,
    pub rejects_filename: String,
    pub package_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: constants::DEFAULT_OUTPUT_DELIMITER,
            include_bom: false,
            write_rejects: false,
            package_outputs: false,
            enriched_filename: constants::ENRICHED_OUTPUT_FILENAME.to_string(),
            report_filename: constants::REPORT_OUTPUT_FILENAME.to_string(),
            rejects_filename: constants::REJECTS_OUTPUT_FILENAME.to_string(),
            package_filename: constants::PACKAGE_OUTPUT_FILENAME.to_string(),
        }
    }
}

/// Logging preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            structured: true,
        }
    }
}

impl Config {
    /// Create a configuration with explicit input/output paths and defaults
    /// for everything else
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        let mut config = Self::default();
        config.processing.input_path = input_path;
        config.processing.output_path = output_path;
        config
    }

    /// Default config file location under the user config directory
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(base.join("ans_processor").join("config.json"))
    }

    /// Load configuration in layers: defaults, then an optional JSON config
    /// file, then explicit input/output overrides
    pub fn load_layered(
        input_path: Option<PathBuf>,
        output_path: Option<PathBuf>,
        config_file: Option<&Path>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::configuration(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                let config: Config = serde_json::from_str(&content).map_err(|e| {
                    Error::configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!("Loaded config file: {}", path.display());
                config
            }
            None => Self::default(),
        };

        if let Some(input) = input_path {
            config.processing.input_path = input;
        }
        if let Some(output) = output_path {
            config.processing.output_path = output;
        }

        Ok(config)
    }

    /// Resolved registry path (explicit setting or the input-dir default)
    pub fn registry_path(&self) -> PathBuf {
        match &self.processing.registry_path {
            Some(path) => path.clone(),
            None => self
                .processing
                .input_path
                .join(constants::REGISTRY_FILENAME),
        }
    }

    /// Work area for extracted archive contents
    pub fn extraction_root(&self) -> PathBuf {
        self.processing
            .output_path
            .join(constants::EXTRACTION_DIR_NAME)
    }

    pub fn enriched_output_path(&self) -> PathBuf {
        self.processing
            .output_path
            .join(&self.output.enriched_filename)
    }

    pub fn report_output_path(&self) -> PathBuf {
        self.processing
            .output_path
            .join(&self.output.report_filename)
    }

    pub fn rejects_output_path(&self) -> PathBuf {
        self.processing
            .output_path
            .join(&self.output.rejects_filename)
    }

    pub fn package_output_path(&self) -> PathBuf {
        self.processing
            .output_path
            .join(&self.output.package_filename)
    }

    /// Create the output directory if it does not exist
    pub fn ensure_output_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.processing.output_path).map_err(|e| {
            Error::configuration(format!(
                "Failed to create output directory '{}': {}",
                self.processing.output_path.display(),
                e
            ))
        })
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.encoding.candidates.is_empty() {
            return Err(Error::configuration(
                "encoding.candidates must list at least one encoding",
            ));
        }
        if self.schema.delimiter_candidates.is_empty() {
            return Err(Error::configuration(
                "schema.delimiter_candidates must list at least one delimiter",
            ));
        }
        if self.schema.aliases.entity_name.is_empty()
            || self.schema.aliases.state_code.is_empty()
            || self.schema.aliases.expense_amount.is_empty()
            || self.schema.aliases.account_code.is_empty()
        {
            return Err(Error::configuration(
                "schema.aliases must name at least one spelling per mandatory column",
            ));
        }
        if let Some(bad) = self
            .validation
            .state_codes
            .iter()
            .find(|code| code.chars().count() != 2)
        {
            return Err(Error::configuration(format!(
                "validation.state_codes entries must be 2-letter codes, got '{}'",
                bad
            )));
        }
        if self.validation.min_year > self.validation.max_year {
            return Err(Error::configuration(format!(
                "validation year range is empty: {}..={}",
                self.validation.min_year, self.validation.max_year
            )));
        }
        if self.aggregation.group_memory_limit == 0 {
            return Err(Error::configuration(
                "aggregation.group_memory_limit must be positive",
            ));
        }
        if self.aggregation.spill_partitions == 0 {
            return Err(Error::configuration(
                "aggregation.spill_partitions must be positive",
            ));
        }
        if self.enrichment.unmatched_registry_id.trim().is_empty() {
            return Err(Error::configuration(
                "enrichment.unmatched_registry_id must not be blank",
            ));
        }
        Ok(())
    }

    /// Set the registry path explicitly
    pub fn with_registry_path(mut self, path: PathBuf) -> Self {
        self.processing.registry_path = Some(path);
        self
    }

    /// Disable the fuzzy enrichment fallback
    pub fn without_fuzzy_matching(mut self) -> Self {
        self.enrichment.fuzzy_matching = false;
        self
    }

    /// Set the distinct-group threshold for the spill switch
    pub fn with_group_memory_limit(mut self, limit: usize) -> Self {
        self.aggregation.group_memory_limit = limit;
        self
    }

    /// Enable the rejected-records export
    pub fn with_rejects_export(mut self) -> Self {
        self.output.write_rejects = true;
        self
    }

    /// Enable output packaging into a ZIP archive
    pub fn with_output_packaging(mut self) -> Self {
        self.output.package_outputs = true;
        self
    }

    /// Enable dry-run mode
    pub fn with_dry_run(mut self) -> Self {
        self.processing.dry_run = true;
        self
    }
}
