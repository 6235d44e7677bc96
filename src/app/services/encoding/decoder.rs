//! Ordered candidate-encoding decoder
//!
//! Tries each configured encoding in order and returns the first strict
//! decode. UTF-8 and cp1252 reject invalid input, so a genuinely legacy file
//! falls through to the infallible latin-1 terminal candidate. Configurations
//! without a terminal candidate can therefore fail, which is reported as a
//! per-file encoding error.

use crate::{Error, Result};
use tracing::{debug, trace};

/// Result of a successful decode: the text plus the winning candidate name
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding_used: String,
}

/// Decodes raw file bytes via an ordered list of candidate encodings
#[derive(Debug, Clone)]
pub struct TextDecoder {
    candidates: Vec<String>,
}

impl TextDecoder {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Decode `bytes`, trying each candidate in order
    ///
    /// `file_label` only names the file in errors and logs.
    pub fn decode(&self, bytes: &[u8], file_label: &str) -> Result<DecodedText> {
        for candidate in &self.candidates {
            if let Some(text) = try_decode(candidate, bytes) {
                trace!("Decoded '{}' as {}", file_label, candidate);
                return Ok(DecodedText {
                    text,
                    encoding_used: candidate.clone(),
                });
            }
            debug!("Candidate encoding {} rejected '{}'", candidate, file_label);
        }

        Err(Error::encoding(
            file_label,
            format!(
                "no candidate encoding decodes this file (tried: {})",
                self.candidates.join(", ")
            ),
        ))
    }
}

/// Byte values with no assignment in the cp1252 code page
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Strict single-candidate decode; `None` when the bytes are invalid for it
fn try_decode(candidate: &str, bytes: &[u8]) -> Option<String> {
    match candidate.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => {
            let stripped = strip_utf8_bom(bytes);
            std::str::from_utf8(stripped).ok().map(|s| s.to_string())
        }
        // encoding_rs implements the WHATWG superset that maps all 256 byte
        // values, so the undefined cp1252 positions must be rejected here to
        // keep this candidate strict.
        "cp1252" | "windows-1252" => {
            if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                return None;
            }
            encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned())
        }
        // latin-1 maps every byte value, so it never fails
        "latin-1" | "latin1" | "iso-8859-1" => {
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        other => encoding_rs::Encoding::for_label(other.as_bytes()).and_then(|enc| {
            enc.decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned())
        }),
    }
}

fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(crate::constants::UTF8_BOM).unwrap_or(bytes)
}
