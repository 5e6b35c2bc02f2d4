//! Plain-text summary: parse statistics and one line per field.

use crate::error::Result;
use crate::model::StyleModel;
use crate::render::Renderer;

pub struct TextRenderer;

const PREVIEW_CHARS: usize = 50;

impl Renderer for TextRenderer {
    fn render(&self, model: &StyleModel) -> Result<String> {
        let meta = &model.metadata;
        let mut out = String::new();
        out.push_str("Parsing summary:\n");
        out.push_str(&format!("  Source: {}\n", meta.source_file));
        out.push_str(&format!("  Start line: {}\n", meta.start_line));
        out.push_str(&format!("  End line: {}\n", meta.end_line));
        out.push_str(&format!("  Lines parsed: {}\n", meta.lines_scanned));
        out.push_str(&format!("  Field entries found: {}\n", model.fields.len()));
        out.push_str(&format!("  Known types discovered: {}\n", model.known_types.len()));
        out.push_str(&format!("  Enums: {}\n", model.enum_definitions.len()));
        out.push_str(&format!("  Nested structs: {}\n", model.struct_definitions.len()));

        if !model.fields.is_empty() {
            out.push_str("\nField entries:\n");
            for (i, field) in model.fields.iter().enumerate() {
                out.push_str(&format!(
                    "  {:3}. {} {} - {}\n",
                    i + 1,
                    field.ty,
                    field.name,
                    preview(&field.description)
                ));
            }
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

/// First `PREVIEW_CHARS` characters on one line, with an ellipsis when cut.
fn preview(description: &str) -> String {
    let flat = description.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};

    #[test]
    fn preview_truncates_long_text() {
        let long = "x".repeat(60);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(50)));
        assert_eq!(preview("short\ntext"), "short text");
    }

    #[test]
    fn lists_fields() {
        let text = "struct FormatStyle {\n  /// The column limit.\n  unsigned ColumnLimit;\n  bool Foo;\n};\n";
        let model = parse(text, &ParseOptions::default()).unwrap();
        let out = TextRenderer.render(&model).unwrap();
        assert!(out.contains("  Field entries found: 2\n"));
        assert!(out.contains("    1. unsigned ColumnLimit - The column limit.\n"));
        assert!(out.contains("    2. bool Foo - \n"));
    }
}
