//! Field-level normalization helpers for the schema mapper
//!
//! Covers the two messy conversions the source files need: Brazilian decimal
//! separators (`1.234,56`, `R$ 100,00`) and reporting periods derived from
//! either period columns or filename patterns like `1T2025`, `2025_1` and
//! `202503`.

use crate::app::models::ReportPeriod;
use once_cell::sync::Lazy;
use regex::Regex;

/// `1T2025` style (quarter, then year), case-insensitive
static QUARTER_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([1-4])T(\d{4})").expect("valid regex"));

/// `2025_1` / `2025-3` style (year, then quarter)
static YEAR_QUARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[_-]([1-4])(?:\D|$)").expect("valid regex"));

/// `YYYYMM` style; the month maps onto its quarter
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})(0[1-9]|1[0-2])").expect("valid regex"));

/// Normalize a raw amount cell to a canonical decimal string
///
/// Strips currency symbols and spacing, removes thousands separators and
/// converts a decimal comma to a point. The result is still a string; the
/// validator performs the numeric parse so non-numeric garbage is rejected
/// with a reason instead of disappearing here.
pub fn normalize_decimal(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let has_comma = cleaned.contains(',');
    let has_point = cleaned.contains('.');

    if has_comma && has_point {
        // the rightmost separator is the decimal one
        if cleaned.rfind(',') > cleaned.rfind('.') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else if has_comma {
        if cleaned.matches(',').count() == 1 {
            cleaned.replace(',', ".")
        } else {
            // multiple commas can only be thousands groups
            cleaned.replace(',', "")
        }
    } else {
        cleaned
    }
}

/// Derive the reporting period from a source filename stem
///
/// Tried in order of specificity: `1T2025`, `2025_1`, `202503`. Returns
/// `None` when no pattern matches; the caller falls back to the sentinel
/// period, which validation rejects.
pub fn period_from_filename(stem: &str) -> Option<ReportPeriod> {
    if let Some(caps) = QUARTER_YEAR.captures(stem) {
        let quarter: u8 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        return Some(ReportPeriod::new(year, quarter));
    }

    if let Some(caps) = YEAR_QUARTER.captures(stem) {
        let year: i32 = caps[1].parse().ok()?;
        let quarter: u8 = caps[2].parse().ok()?;
        return Some(ReportPeriod::new(year, quarter));
    }

    if let Some(caps) = YEAR_MONTH.captures(stem) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u8 = caps[2].parse().ok()?;
        return Some(ReportPeriod::new(year, (month - 1) / 3 + 1));
    }

    None
}

/// Parse year and quarter cells into a period; `None` on any parse failure
pub fn period_from_cells(year_cell: &str, quarter_cell: &str) -> Option<ReportPeriod> {
    let year: i32 = year_cell.trim().parse().ok()?;
    // some vintages write the quarter as "1T" or "1º"
    let quarter_digits: String = quarter_cell
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let quarter: u8 = quarter_digits.parse().ok()?;
    Some(ReportPeriod::new(year, quarter))
}
