//! Heuristic mojibake repair for double-encoded text
//!
//! A UTF-8 file read as Windows-1252 and re-saved as UTF-8 shows the
//! characteristic "Ã¡"/"Ã§" pairs throughout Portuguese operator names. The
//! repair first attempts the inverse roundtrip (re-encode the characters to
//! their single-byte form, re-decode as UTF-8); when the roundtrip is not
//! possible it falls back to the literal replacement pairs of the configured
//! table. Repair is best-effort by contract: text without any marker passes
//! through untouched.

use crate::config::MojibakeTable;
use tracing::trace;

/// Applies the configured repair table to decoded text
#[derive(Debug, Clone)]
pub struct MojibakeRepairer {
    table: MojibakeTable,
}

impl MojibakeRepairer {
    pub fn new(table: MojibakeTable) -> Self {
        Self { table }
    }

    /// Version tag of the active repair table
    pub fn table_version(&self) -> &str {
        &self.table.version
    }

    /// Repair `text` if it shows a corruption marker; otherwise pass through
    pub fn repair(&self, text: &str) -> String {
        if !self.has_marker(text) {
            return text.to_string();
        }

        if let Some(fixed) = roundtrip_repair(text) {
            trace!("Mojibake roundtrip repair applied (table {})", self.table.version);
            return fixed;
        }

        // Roundtrip impossible (e.g. replacement characters already present):
        // fall back to the table's literal pairs, applied in order.
        let mut repaired = text.to_string();
        for (from, to) in &self.table.replacements {
            repaired = repaired.replace(from.as_str(), to.as_str());
        }
        trace!("Mojibake literal repair applied (table {})", self.table.version);
        repaired
    }

    fn has_marker(&self, text: &str) -> bool {
        self.table.markers.iter().any(|m| text.contains(m.as_str()))
    }
}

/// Undo one level of double-encoding: map each character back to its
/// Windows-1252 byte and re-decode the byte sequence as strict UTF-8
fn roundtrip_repair(text: &str) -> Option<String> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    if had_errors {
        return None;
    }
    String::from_utf8(bytes.into_owned()).ok()
}
