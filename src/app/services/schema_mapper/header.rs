//! Header-row location and alias-based column binding
//!
//! A statement file may open with a variable-size preamble (titles, export
//! timestamps, regulator notices) before the real header row. The header row
//! is the first row whose cells bind, through the alias table, every
//! mandatory canonical column: entity name, state code, expense amount and
//! account code. Year and quarter columns are optional; when absent the
//! period comes from the filename.

use crate::config::ColumnAliases;
use csv::StringRecord;

/// Canonical-column to cell-index bindings for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBindings {
    pub entity_name: usize,
    pub state_code: usize,
    pub expense_amount: usize,
    pub account_code: usize,
    pub year: Option<usize>,
    pub quarter: Option<usize>,
}

impl ColumnBindings {
    /// Try to bind a row as the header; `None` when any mandatory column
    /// is missing (the row is preamble, not the header)
    pub fn bind(row: &StringRecord, aliases: &ColumnAliases) -> Option<Self> {
        let normalized: Vec<String> = row.iter().map(normalize_header_cell).collect();

        let find = |names: &[String]| -> Option<usize> {
            normalized
                .iter()
                .position(|cell| names.iter().any(|a| cell.eq_ignore_ascii_case(a)))
        };

        Some(ColumnBindings {
            entity_name: find(&aliases.entity_name)?,
            state_code: find(&aliases.state_code)?,
            expense_amount: find(&aliases.expense_amount)?,
            account_code: find(&aliases.account_code)?,
            year: find(&aliases.year),
            quarter: find(&aliases.quarter),
        })
    }

    /// Highest index a data row must cover to map its mandatory fields
    pub fn max_mandatory_index(&self) -> usize {
        self.entity_name
            .max(self.state_code)
            .max(self.expense_amount)
            .max(self.account_code)
    }
}

/// Trim, strip stray BOM/quote characters and uppercase for alias comparison
fn normalize_header_cell(cell: &str) -> String {
    cell.trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '\u{feff}')
        .trim()
        .to_uppercase()
}
