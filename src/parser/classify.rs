//! Line classifier: decides what a trimmed header line is before any
//! extraction is attempted. First matching rule wins.

use regex::Regex;
use std::sync::LazyLock;

/// Documentation comment marker. Text after it is attached to the next
/// declaration.
pub const DOC_MARKER: &str = "///";

/// Prefixes of lines that are comments but not documentation.
const PLAIN_COMMENT_MARKERS: &[&str] = &["//", "/*", "*"];

static RE_TYPE_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(enum|struct)\s+(?:class\s+|struct\s+)?(\w+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Enum,
    Struct,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `///` line with the marker and at most one following space removed.
    Doc(&'a str),
    /// Blank line or plain comment.
    Skip,
    /// `enum X {` / `struct X {`; `name` is `None` for anonymous bodies.
    /// `inline_body` is whatever sits between the first `{` and the next `}`
    /// on the same line, when non-empty.
    TypeOpener {
        keyword: TypeKeyword,
        name: Option<&'a str>,
        inline_body: Option<&'a str>,
    },
    /// Anything else: a field, enumerator, method, brace line...
    Candidate(&'a str),
}

/// Classify one trimmed line.
pub fn classify(trimmed: &str) -> LineClass<'_> {
    if let Some(text) = trimmed.strip_prefix(DOC_MARKER) {
        return LineClass::Doc(text.strip_prefix(' ').unwrap_or(text));
    }

    if trimmed.is_empty() || PLAIN_COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
        return LineClass::Skip;
    }

    let keyword = if trimmed.starts_with("enum ") {
        Some(TypeKeyword::Enum)
    } else if trimmed.starts_with("struct ") {
        Some(TypeKeyword::Struct)
    } else {
        None
    };

    match keyword {
        Some(keyword) if trimmed.contains('{') => LineClass::TypeOpener {
            keyword,
            name: RE_TYPE_OPENER
                .captures(trimmed)
                .and_then(|caps| caps.get(2))
                .map(|m| m.as_str()),
            inline_body: inline_body(trimmed),
        },
        _ => LineClass::Candidate(trimmed),
    }
}

fn inline_body(line: &str) -> Option<&str> {
    let open = line.find('{')?;
    let rest = &line[open + 1..];
    let body = match rest.find('}') {
        Some(close) => &rest[..close],
        None => rest,
    };
    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Drop a trailing `// ...` comment from a code line.
pub fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

/// Width of a line's leading whitespace.
pub fn indent_of(raw: &str) -> usize {
    raw.len() - raw.trim_start().len()
}

/// `(opening, closing)` brace counts of a code line.
pub fn count_braces(code: &str) -> (usize, usize) {
    code.chars().fold((0, 0), |(open, close), c| match c {
        '{' => (open + 1, close),
        '}' => (open, close + 1),
        _ => (open, close),
    })
}

/// True when the last `}` on the line is followed only by `;`.
pub fn is_struct_terminator(code: &str) -> bool {
    code.rfind('}')
        .map(|pos| code[pos + 1..].trim() == ";")
        .unwrap_or(false)
}
