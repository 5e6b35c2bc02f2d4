//! Enumerator extractor: reads `BS_Attach,` or `LS_Cpp11 = 3,` into a
//! bare identifier.

use super::classify::strip_line_comment;
use super::field::is_excluded;

/// Try to read a single enumerator from a trimmed line inside an enum body.
pub fn extract_enumerator(line: &str) -> Option<String> {
    let line = strip_line_comment(line).trim();
    if is_excluded(line) {
        return None;
    }

    let cleaned = line.trim_end_matches([',', ';']).trim();
    let ident = match cleaned.split_once('=') {
        Some((name, _value)) => name.trim(),
        None => cleaned,
    };

    let valid = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    valid.then(|| ident.to_string())
}

/// Enumerators of a body written on the opener line:
/// `enum Spacing { SP_Before, SP_After };`.
pub fn extract_inline_enumerators(body: &str) -> Vec<String> {
    body.split(',').filter_map(|piece| extract_enumerator(piece.trim())).collect()
}
