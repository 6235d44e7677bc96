//! Cell delimiter detection
//!
//! The regulator's exports switched between semicolons and commas over the
//! years, and a few intermediary tools re-export with tabs. The delimiter is
//! chosen by counting candidate occurrences over a leading sample of the
//! file; ties go to the earlier candidate in the configured order.

/// Number of leading lines sampled for detection
const SAMPLE_LINES: usize = 20;

/// Pick the most frequent candidate delimiter in the leading sample
///
/// Falls back to the first candidate when the sample contains none of them
/// (single-column files still parse that way).
pub fn detect_delimiter(text: &str, candidates: &[char]) -> char {
    let sample: String = text.lines().take(SAMPLE_LINES).collect::<Vec<_>>().join("\n");

    let mut best = candidates.first().copied().unwrap_or(';');
    let mut best_count = 0usize;

    for &candidate in candidates {
        let count = sample.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}
