//! Application constants for ANS processor
//!
//! This module contains all configuration constants, default values,
//! and mappings used throughout the ANS processor application.

// =============================================================================
// Encoding and Mojibake Repair
// =============================================================================

/// Ordered candidate encodings tried when decoding source files.
///
/// UTF-8 is tried strictly first; cp1252 is strict and rejects its undefined
/// bytes; latin-1 maps every byte and therefore terminates the chain.
pub const DEFAULT_ENCODING_CANDIDATES: &[&str] = &["utf-8", "cp1252", "latin-1"];

/// Mojibake repair heuristics for double-encoded government exports
pub mod mojibake {
    /// Version tag of the shipped repair table
    pub const TABLE_VERSION: &str = "2024.1";

    /// Marker substrings whose presence triggers a repair attempt
    pub const MARKERS: &[&str] = &["Ã", "Â", "\u{fffd}"];

    /// Literal fallback replacements applied when the roundtrip repair fails
    pub const REPLACEMENTS: &[(&str, &str)] = &[
        ("Ã¡", "á"),
        ("Ã¢", "â"),
        ("Ã£", "ã"),
        ("Ã©", "é"),
        ("Ãª", "ê"),
        ("Ã­", "í"),
        ("Ã³", "ó"),
        ("Ã´", "ô"),
        ("Ãµ", "õ"),
        ("Ãº", "ú"),
        ("Ã§", "ç"),
        ("Ã‰", "É"),
        ("Ã‡", "Ç"),
        ("Ã•", "Õ"),
        ("Â", ""),
    ];
}

// =============================================================================
// Schema Mapping Defaults
// =============================================================================

/// Candidate cell delimiters, in preference order on ties
pub const DEFAULT_DELIMITER_CANDIDATES: &[char] = &[';', ',', '\t', '|'];

/// Historical column names per canonical field, as seen across file vintages
pub mod aliases {
    pub const ENTITY_NAME: &[&str] = &[
        "RAZAO_SOCIAL",
        "NM_RAZAO_SOCIAL",
        "NOME_OPERADORA",
        "OPERADORA",
        "ENTIDADE",
    ];

    pub const STATE_CODE: &[&str] = &["UF", "SG_UF", "SIGLA_UF", "ESTADO"];

    pub const YEAR: &[&str] = &["ANO", "NR_ANO", "EXERCICIO"];

    pub const QUARTER: &[&str] = &["TRIMESTRE", "NR_TRIMESTRE", "TRI"];

    pub const EXPENSE_AMOUNT: &[&str] = &[
        "VL_SALDO_FINAL",
        "VALOR_DESPESA",
        "VL_DESPESA",
        "VALOR",
        "VLR",
    ];

    pub const ACCOUNT_CODE: &[&str] =
        &["CD_CONTA_CONTABIL", "CONTA_CONTABIL", "CD_CONTA", "CONTA"];
}

/// Registry (cadop) column names per canonical registry field
pub mod registry_aliases {
    pub const REGISTRY_ID: &[&str] = &["REGISTRO_ANS", "REGISTRO", "REG_ANS", "CD_REGISTRO"];
    pub const LEGAL_NAME: &[&str] = &["RAZAO_SOCIAL", "NM_RAZAO_SOCIAL", "RAZAO"];
    pub const TRADE_NAME: &[&str] = &["NOME_FANTASIA", "FANTASIA"];
    pub const STATE: &[&str] = &["UF", "SG_UF"];
}

// =============================================================================
// Validation Defaults
// =============================================================================

/// The 27 Brazilian federative unit codes
pub const BRAZILIAN_STATE_CODES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Plausible report year range (the regulator was created in 1998)
pub const DEFAULT_MIN_YEAR: i32 = 1998;
pub const DEFAULT_MAX_YEAR: i32 = 2099;

// =============================================================================
// Enrichment Defaults
// =============================================================================

/// Sentinel registry id for records with no registry match
pub const UNMATCHED_REGISTRY_ID: &str = "UNMATCHED";

// =============================================================================
// Aggregation Defaults
// =============================================================================

/// Distinct-group count above which aggregation spills to disk
pub const DEFAULT_GROUP_MEMORY_LIMIT: usize = 100_000;

/// Number of hash partitions used by the spill backend
pub const SPILL_PARTITIONS: usize = 16;

// =============================================================================
// Network Constants
// =============================================================================

/// Regulator open-data endpoints and download policy
pub mod network {
    /// Static directory listing of quarterly statement archives
    pub const STATEMENTS_BASE_URL: &str =
        "https://dadosabertos.ans.gov.br/FTP/PDA/demonstracoes_contabeis/";

    /// Active-operator registry CSV
    pub const REGISTRY_URL: &str =
        "https://dadosabertos.ans.gov.br/FTP/PDA/operadoras_de_plano_de_saude_ativas/Relatorio_cadop.csv";

    /// Newest archives downloaded per fetch
    pub const DEFAULT_MAX_ARCHIVES: usize = 3;

    /// Retry policy for transient download failures
    pub const MAX_RETRIES: usize = 3;
    pub const RETRY_DELAY_MS: u64 = 1_000;

    /// Request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Concurrent downloads per fetch
    pub const DOWNLOAD_CONCURRENCY: usize = 2;
}

// =============================================================================
// File and Directory Constants
// =============================================================================

/// Enriched record export filename
pub const ENRICHED_OUTPUT_FILENAME: &str = "despesas_enriquecidas.csv";

/// Aggregated report filename
pub const REPORT_OUTPUT_FILENAME: &str = "despesas_agregadas.csv";

/// Rejected records export filename
pub const REJECTS_OUTPUT_FILENAME: &str = "registros_rejeitados.csv";

/// Packaged output archive filename
pub const PACKAGE_OUTPUT_FILENAME: &str = "despesas_output.zip";

/// Subdirectory for extracted archive contents inside the work area
pub const EXTRACTION_DIR_NAME: &str = "extracted";

/// Registry filename used when fetching
pub const REGISTRY_FILENAME: &str = "Relatorio_cadop.csv";

/// Input extensions recognized as tabular source files
pub const TABULAR_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Archive extension recognized as input
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Archive junk entries skipped during extraction
pub const ARCHIVE_JUNK_MARKERS: &[&str] = &["__MACOSX", ".DS_Store"];

/// UTF-8 byte order mark written when Excel-compatible output is requested
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// =============================================================================
// Output Formatting Defaults
// =============================================================================

/// Output CSV delimiter (the regulator's own exports use semicolons)
pub const DEFAULT_OUTPUT_DELIMITER: char = ';';

// =============================================================================
// Performance and Monitoring Constants
// =============================================================================

/// Progress bar template shared by all commands
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

// =============================================================================
// Helper Functions
// =============================================================================

/// Check whether a path extension marks a tabular source file
pub fn is_tabular_extension(extension: &str) -> bool {
    TABULAR_EXTENSIONS
        .iter()
        .any(|e| extension.eq_ignore_ascii_case(e))
}

/// Check whether an archive entry name is packaging junk
pub fn is_archive_junk(entry_name: &str) -> bool {
    ARCHIVE_JUNK_MARKERS.iter().any(|m| entry_name.contains(m))
}

/// Derive the extraction directory name for an archive file stem
pub fn extraction_dir_for(archive_stem: &str) -> String {
    format!("{}_{}", EXTRACTION_DIR_NAME, archive_stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code_count() {
        assert_eq!(BRAZILIAN_STATE_CODES.len(), 27);
        assert!(BRAZILIAN_STATE_CODES.contains(&"SP"));
        assert!(BRAZILIAN_STATE_CODES.contains(&"DF"));
        assert!(!BRAZILIAN_STATE_CODES.contains(&"XX"));
    }

    #[test]
    fn test_encoding_candidates_terminate() {
        // latin-1 decodes any byte sequence, keeping the chain total
        assert_eq!(DEFAULT_ENCODING_CANDIDATES.last(), Some(&"latin-1"));
    }

    #[test]
    fn test_tabular_extension_detection() {
        assert!(is_tabular_extension("csv"));
        assert!(is_tabular_extension("CSV"));
        assert!(is_tabular_extension("txt"));
        assert!(!is_tabular_extension("xlsx"));
        assert!(!is_tabular_extension("zip"));
    }

    #[test]
    fn test_archive_junk_detection() {
        assert!(is_archive_junk("__MACOSX/1T2025.csv"));
        assert!(is_archive_junk("data/.DS_Store"));
        assert!(!is_archive_junk("1T2025.csv"));
    }

    #[test]
    fn test_extraction_dir_name() {
        assert_eq!(extraction_dir_for("1T2025"), "extracted_1T2025");
    }

    #[test]
    fn test_mojibake_table_is_nonempty() {
        assert!(!mojibake::MARKERS.is_empty());
        assert!(!mojibake::REPLACEMENTS.is_empty());
        assert!(!mojibake::TABLE_VERSION.is_empty());
    }
}
