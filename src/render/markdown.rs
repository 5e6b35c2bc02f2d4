//! Markdown renderer: an option reference in the spirit of
//! ClangFormatStyleOptions.
//!
//! Doxygen markers used by Format.h are translated:
//! `\code` / `\code{.yaml}` / `\endcode` become fenced blocks and
//! `\version N` becomes an "introduced in" note.

use crate::error::Result;
use crate::model::*;
use crate::render::Renderer;
use regex::Regex;
use std::sync::LazyLock;

pub struct MarkdownRenderer;

static RE_CODE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\code(?:\{\.(\w+)\})?\s*$").unwrap());

static RE_CODE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\endcode\s*$").unwrap());

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\version\s+(\S+)\s*$").unwrap());

static RE_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\(note|warning)\s*(.*)$").unwrap());

impl Renderer for MarkdownRenderer {
    fn render(&self, model: &StyleModel) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        lines.push("# Style options\n".to_string());
        lines.push(format!(
            "Extracted from `{}` (lines {}-{}).\n",
            model.metadata.source_file, model.metadata.start_line, model.metadata.end_line
        ));

        if !model.fields.is_empty() {
            lines.push("## Index\n".to_string());
            for field in &model.fields {
                lines.push(format!("* [{}](#{})", field.name, anchor(&field.name)));
            }
            lines.push(String::new());
        }

        for field in &model.fields {
            render_field(&mut lines, model, field);
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_field(lines: &mut Vec<String>, model: &StyleModel, field: &Field) {
    lines.push(format!("### {}\n", field.name));
    lines.push(format!(
        "**Type:** `{}` ({}) · line {}\n",
        field.ty,
        kind_label(field.kind),
        field.line
    ));

    if !field.description.is_empty() {
        lines.push(convert_doc(&field.description));
        lines.push(String::new());
    }

    if let Some(def) = model.enum_for(field) {
        if !def.values.is_empty() {
            lines.push("#### Possible values\n".to_string());
            for value in &def.values {
                lines.push(list_item(
                    &format!("`{}` (in source: `{}`)", value.config_name(), value.name),
                    &value.description,
                ));
            }
            lines.push(String::new());
        }
    }

    if let Some(def) = model.struct_for(field) {
        if !def.fields.is_empty() {
            lines.push("#### Nested options\n".to_string());
            for member in &def.fields {
                lines.push(list_item(
                    &format!("`{}` (`{}`)", member.name, member.ty),
                    &member.description,
                ));
            }
            lines.push(String::new());
        }
    }
}

fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Boolean => "boolean",
        FieldKind::Integer => "integer",
        FieldKind::Unsigned => "unsigned",
        FieldKind::String => "string",
        FieldKind::StringList => "list of strings",
        FieldKind::List => "list",
        FieldKind::Optional => "optional",
        FieldKind::Custom => "custom",
    }
}

/// `* term` followed by the converted description indented under it.
fn list_item(term: &str, description: &str) -> String {
    if description.is_empty() {
        return format!("* {}", term);
    }
    let body = convert_doc(description).replace('\n', "\n  ");
    format!("* {}\n\n  {}\n", term, body)
}

/// Translate Format.h doc markup into markdown.
fn convert_doc(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut code: Option<Vec<&str>> = None;

    for line in text.lines() {
        if let Some(block) = code.as_mut() {
            if RE_CODE_CLOSE.is_match(line) {
                out.push(unindent(block));
                out.push("```".to_string());
                code = None;
            } else {
                block.push(line);
            }
            continue;
        }

        if let Some(caps) = RE_CODE_OPEN.captures(line) {
            let lang = caps.get(1).map(|m| m.as_str()).unwrap_or("cpp");
            out.push(format!("```{}", lang));
            code = Some(Vec::new());
        } else if let Some(caps) = RE_VERSION.captures(line) {
            out.push(format!("_Introduced in clang-format {}._", &caps[1]));
        } else if let Some(caps) = RE_NOTE.captures(line) {
            let label = if &caps[1] == "note" { "Note" } else { "Warning" };
            out.push(format!("> **{}:** {}", label, &caps[2]));
        } else {
            out.push(line.to_string());
        }
    }

    // Unclosed block: close it rather than swallow the rest of the page.
    if let Some(block) = code {
        out.push(unindent(&block));
        out.push("```".to_string());
    }

    out.join("\n")
}

/// Remove common leading indentation from code lines.
fn unindent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { l.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// GitHub heading anchor: lowercase, keep alphanumerics, space and hyphen,
/// spaces become hyphens.
fn anchor(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .replace(' ', "-")
}
