//! Tests for delimiter detection

use crate::app::services::schema_mapper::delimiter::detect_delimiter;
use crate::constants::DEFAULT_DELIMITER_CANDIDATES;

#[test]
fn test_semicolon_detected() {
    let text = "RAZAO_SOCIAL;UF;VALOR\nAcme;SP;100,00\n";
    assert_eq!(detect_delimiter(text, DEFAULT_DELIMITER_CANDIDATES), ';');
}

#[test]
fn test_comma_detected() {
    let text = "RAZAO_SOCIAL,UF,VALOR\nAcme,SP,100.00\n";
    assert_eq!(detect_delimiter(text, DEFAULT_DELIMITER_CANDIDATES), ',');
}

#[test]
fn test_tab_detected() {
    let text = "RAZAO_SOCIAL\tUF\tVALOR\nAcme\tSP\t100.00\n";
    assert_eq!(detect_delimiter(text, DEFAULT_DELIMITER_CANDIDATES), '\t');
}

#[test]
fn test_tie_prefers_configured_order() {
    // one semicolon and one comma per line: the earlier candidate wins
    let text = "a;b,c\nd;e,f\n";
    assert_eq!(detect_delimiter(text, DEFAULT_DELIMITER_CANDIDATES), ';');
}

#[test]
fn test_no_candidate_falls_back_to_first() {
    let text = "singlecolumn\nvalue\n";
    assert_eq!(detect_delimiter(text, DEFAULT_DELIMITER_CANDIDATES), ';');
}

#[test]
fn test_detection_ignores_late_noise() {
    // only the leading sample counts; a comma-dense footer past 20 lines
    // must not override the semicolon header
    let mut text = String::from("A;B;C\n");
    for _ in 0..25 {
        text.push_str("1;2;3\n");
    }
    text.push_str(",,,,,,,,,,,,,,,,,,,,,,\n");
    assert_eq!(detect_delimiter(&text, DEFAULT_DELIMITER_CANDIDATES), ';');
}
