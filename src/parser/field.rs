//! Field extractor: matches a declaration line like `unsigned ColumnLimit;`
//! against an ordered table of grammar forms.

use super::classify::strip_line_comment;
use super::registry::TypeRegistry;
use crate::model::FieldKind;
use regex::Regex;
use std::sync::LazyLock;

/// Synthetic member that marks a style as inheriting its parent's
/// configuration. Never a user-facing option.
pub const INHERITS_PARENT_CONFIG: &str = "InheritsParentConfig";

/// Suffixes that mark an unregistered lowercase-or-not token as a type name.
const TYPE_NAME_SUFFIXES: &[&str] = &["Style", "Kind", "Type", "Mode", "Alignment"];

/// Line prefixes that can never start a data member.
const EXCLUDED_PREFIXES: &[&str] = &[
    "enum ", "struct ", "public:", "private:", "protected:", "//", "/*", "*", "#", "typedef",
    "using ", "friend ",
];

// Evaluated top to bottom; first match wins. `None` marks the custom-type
// fallback whose type token still has to be validated. A default value is
// `= ...` but never `==`, so `operator==` declarations stay unmatched.
static FIELD_FORMS: LazyLock<Vec<(Option<FieldKind>, Regex)>> = LazyLock::new(|| {
    [
        (Some(FieldKind::Boolean), r"^(bool)\s+(\w+)(?:\s*=[^=].*)?$"),
        (Some(FieldKind::Integer), r"^(int)\s+(\w+)(?:\s*=[^=].*)?$"),
        (Some(FieldKind::Unsigned), r"^(unsigned)\s+(\w+)(?:\s*=[^=].*)?$"),
        (Some(FieldKind::String), r"^(std::string)\s+(\w+)(?:\s*=[^=].*)?$"),
        (
            Some(FieldKind::StringList),
            r"^(std::vector<std::string>)\s+(\w+)(?:\s*=[^=].*)?$",
        ),
        (Some(FieldKind::List), r"^(std::vector<[^>]+>)\s+(\w+)(?:\s*=[^=].*)?$"),
        (Some(FieldKind::Optional), r"^(std::optional<[^>]+>)\s+(\w+)(?:\s*=[^=].*)?$"),
        (None, r"^(\w+)\s+(\w+)(?:\s*=[^=].*)?$"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect()
});

/// A matched `TYPE NAME` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub ty: String,
    pub name: String,
    pub kind: FieldKind,
}

/// True for lines that structurally cannot be a member or enumerator.
pub(super) fn is_excluded(line: &str) -> bool {
    line.is_empty()
        || line.contains('{')
        || line.contains('}')
        || EXCLUDED_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Try to read a field declaration from a trimmed line.
pub fn extract_field(line: &str, registry: &TypeRegistry) -> Option<Declaration> {
    let line = strip_line_comment(line).trim();
    if is_excluded(line) {
        return None;
    }

    let cleaned = line.trim_end_matches(';').trim();
    if cleaned.is_empty() || cleaned.contains(INHERITS_PARENT_CONFIG) {
        return None;
    }

    FIELD_FORMS.iter().find_map(|(kind, re)| {
        let caps = re.captures(cleaned)?;
        let ty = &caps[1];
        let kind = match kind {
            Some(kind) => *kind,
            None if looks_like_type(ty, registry) => FieldKind::Custom,
            None => return None,
        };
        Some(Declaration {
            ty: ty.to_string(),
            name: caps[2].to_string(),
            kind,
        })
    })
}

/// Known custom type, or a token that reads like one.
fn looks_like_type(token: &str, registry: &TypeRegistry) -> bool {
    registry.contains(token)
        || token.starts_with(|c: char| c.is_ascii_uppercase())
        || TYPE_NAME_SUFFIXES.iter().any(|s| token.ends_with(s))
}
