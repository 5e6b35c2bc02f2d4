//! Style struct scanner: a single forward pass over the header text.
//!
//! The scanner looks for the exact line `struct <Target> {`, then walks the
//! struct body line by line:
//!
//! - `///` lines are buffered as documentation for the next declaration
//! - `enum X {` / `struct X {` openers register `X` as a known type
//! - top-level members become fields, nested struct members become
//!   struct-definition fields, enum body lines become enumerators
//! - brace counts drive the depth tracker until the struct's closing `};`

pub mod assemble;
pub mod classify;
pub mod enumerator;
pub mod field;
pub mod registry;
pub mod tracker;

use crate::error::{Error, Result};
use crate::model::StyleModel;
use assemble::Assembler;
use classify::{classify, count_braces, strip_line_comment, LineClass, TypeKeyword};
use registry::{CommentBuffer, TypeRegistry};
use tracing::{debug, info};
use tracker::{opening_marker, BlockKind, Context, Phase, Tracker, Transition};

pub const DEFAULT_TARGET: &str = "FormatStyle";

/// Knobs for one parse invocation.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name of the struct whose body is mined.
    pub target: String,
    /// Register every nested type name before extracting fields, so fields
    /// may use types declared further down.
    pub resolve_forward_refs: bool,
    /// Identifier reported in the output metadata.
    pub source_id: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            resolve_forward_refs: false,
            source_id: "Format.h".to_string(),
        }
    }
}

/// Parse header text into a style model.
pub fn parse(text: &str, options: &ParseOptions) -> Result<StyleModel> {
    StyleParser::new(options).run(text)
}

/// Scanner state for one invocation. Nothing is shared between instances.
pub struct StyleParser<'o> {
    options: &'o ParseOptions,
    tracker: Tracker,
    registry: TypeRegistry,
    comments: CommentBuffer,
    assembler: Assembler,
    unrecognized: usize,
}

impl<'o> StyleParser<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            tracker: Tracker::default(),
            registry: TypeRegistry::default(),
            comments: CommentBuffer::default(),
            assembler: Assembler::default(),
            unrecognized: 0,
        }
    }

    pub fn run(mut self, text: &str) -> Result<StyleModel> {
        let marker = opening_marker(&self.options.target);
        let lines: Vec<&str> = text.lines().collect();

        for (idx, raw) in lines.iter().enumerate() {
            let line = idx + 1;

            if self.tracker.is_searching() {
                if self.tracker.try_enter(raw, &marker, line) {
                    info!(line, struct_name = %self.options.target, "found target struct");
                    if self.options.resolve_forward_refs {
                        self.register_ahead(&lines[idx + 1..]);
                    }
                }
                continue;
            }

            if self.process_line(line, raw)? == Transition::Finished {
                break;
            }
        }

        self.finish(lines.len())
    }

    /// Pre-pass: register type names declared anywhere in the struct body.
    fn register_ahead(&mut self, body: &[&str]) {
        let mut depth = 1usize;
        for raw in body {
            let trimmed = raw.trim();
            match classify(trimmed) {
                LineClass::Doc(_) | LineClass::Skip => continue,
                LineClass::TypeOpener {
                    name: Some(name), ..
                } => {
                    if self.registry.register(name) {
                        debug!(type_name = name, "pre-registered type");
                    }
                }
                _ => {}
            }
            let (opening, closing) = count_braces(strip_line_comment(trimmed));
            depth = (depth + opening).saturating_sub(closing);
            if depth == 0 {
                break;
            }
        }
    }

    fn process_line(&mut self, line: usize, raw: &str) -> Result<Transition> {
        let trimmed = raw.trim();
        let mut opener = None;

        match classify(trimmed) {
            LineClass::Doc(text) => {
                debug!(line, text, "doc comment");
                self.comments.push(text);
                return Ok(Transition::Continue);
            }
            LineClass::Skip => return Ok(Transition::Continue),
            LineClass::TypeOpener {
                keyword,
                name,
                inline_body,
            } => {
                self.discard_comments(line);
                opener = Some(self.open_type(line, keyword, name, inline_body));
            }
            LineClass::Candidate(text) => {
                if !self.extract(line, text) {
                    self.unrecognized += 1;
                    self.discard_comments(line);
                }
            }
        }

        self.tracker.advance(line, raw, opener)
    }

    fn open_type(
        &mut self,
        line: usize,
        keyword: TypeKeyword,
        name: Option<&str>,
        inline_body: Option<&str>,
    ) -> BlockKind {
        let Some(name) = name else {
            return BlockKind::Anonymous;
        };
        self.registry.register(name);
        debug!(line, type_name = name, ?keyword, "type definition");

        match keyword {
            TypeKeyword::Struct => {
                self.assembler.begin_struct(name);
                BlockKind::Struct(name.to_string())
            }
            TypeKeyword::Enum => {
                self.assembler.begin_enum(name);
                for value in inline_body
                    .map(enumerator::extract_inline_enumerators)
                    .unwrap_or_default()
                {
                    debug!(line, enum_name = name, value = %value, "enumerator");
                    self.assembler
                        .push_enum_value(name, value, String::new(), line);
                }
                BlockKind::Enum(name.to_string())
            }
        }
    }

    /// Run the extractor that fits the current context. Returns whether the
    /// line produced a declaration.
    fn extract(&mut self, line: usize, text: &str) -> bool {
        match self.tracker.context() {
            Context::TopLevel => {
                let Some(decl) = field::extract_field(text, &self.registry) else {
                    return false;
                };
                debug!(line, ty = %decl.ty, field = %decl.name, "field");
                let description = self.comments.take();
                self.assembler.push_field(decl, description, line);
            }
            Context::StructBody(owner) => {
                let Some(decl) = field::extract_field(text, &self.registry) else {
                    return false;
                };
                debug!(line, owner, ty = %decl.ty, field = %decl.name, "nested field");
                let owner = owner.to_string();
                let description = self.comments.take();
                self.assembler
                    .push_struct_field(&owner, decl, description, line);
            }
            Context::EnumBody(owner) => {
                let Some(value) = enumerator::extract_enumerator(text) else {
                    return false;
                };
                debug!(line, enum_name = owner, value = %value, "enumerator");
                let owner = owner.to_string();
                let description = self.comments.take();
                self.assembler
                    .push_enum_value(&owner, value, description, line);
            }
            Context::Opaque => return false,
        }
        true
    }

    fn discard_comments(&mut self, line: usize) {
        let dropped = self.comments.discard();
        if dropped > 0 {
            debug!(line, dropped, "orphaned documentation dropped");
        }
    }

    fn finish(self, total_lines: usize) -> Result<StyleModel> {
        match *self.tracker.phase() {
            Phase::Searching => Err(Error::StructNotFound {
                name: self.options.target.clone(),
                lines_scanned: total_lines,
            }),
            Phase::InTargetStruct {
                start_line, depth, ..
            } => Err(Error::UnterminatedStruct {
                name: self.options.target.clone(),
                start_line,
                line: total_lines,
                depth,
            }),
            Phase::Finished {
                start_line,
                end_line,
            } => {
                info!(
                    start_line,
                    end_line,
                    fields = self.assembler.field_count(),
                    known_types = self.registry.len(),
                    unrecognized = self.unrecognized,
                    "parsing completed"
                );
                Ok(self.assembler.finish(
                    &self.registry,
                    &self.options.source_id,
                    start_line,
                    end_line,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldKind;

    fn parse_default(text: &str) -> Result<StyleModel> {
        parse(text, &ParseOptions::default())
    }

    const SAMPLE: &str = r#"namespace clang {
namespace format {

struct FormatStyle {
  /// Controls foo.
  bool Foo;

  int Bar = 5;

  /// Spacing options.
  enum Spacing {
    /// Space before.
    SP_Before,
    /// Space after.
    SP_After = 3,
  };

  /// How to space.
  Spacing SpaceMode;

  struct BraceWrappingFlags {
    /// Wrap classes.
    bool AfterClass;
    bool operator==(const BraceWrappingFlags &R) const {
      return AfterClass == R.AfterClass;
    }
  };

  BraceWrappingFlags BraceWrapping;

  bool InheritsParentConfig;

  widget Thing;
};

} // namespace format
} // namespace clang
"#;

    #[test]
    fn extracts_documented_boolean() {
        let model = parse_default(SAMPLE).unwrap();
        let foo = model.field("Foo").unwrap();
        assert_eq!(foo.ty, "bool");
        assert_eq!(foo.kind, FieldKind::Boolean);
        assert_eq!(foo.description, "Controls foo.");
        assert_eq!(foo.line, 6);
    }

    #[test]
    fn default_value_leaves_no_trace() {
        let model = parse_default(SAMPLE).unwrap();
        let bar = model.field("Bar").unwrap();
        assert_eq!(bar.ty, "int");
        assert_eq!(bar.description, "");
        assert!(model.fields.iter().all(|f| !f.ty.contains('5') && !f.name.contains('5')));
    }

    #[test]
    fn enum_values_in_order_with_lines() {
        let model = parse_default(SAMPLE).unwrap();
        let spacing = &model.enum_definitions["Spacing"];
        let values: Vec<_> = spacing
            .values
            .iter()
            .map(|v| (v.name.as_str(), v.line, v.description.as_str()))
            .collect();
        assert_eq!(
            values,
            [("SP_Before", 13, "Space before."), ("SP_After", 15, "Space after.")]
        );
        assert!(model.field("Spacing").is_none());
    }

    #[test]
    fn enum_opener_docs_do_not_leak_into_next_field() {
        let model = parse_default(SAMPLE).unwrap();
        assert_eq!(model.field("SpaceMode").unwrap().description, "How to space.");
    }

    #[test]
    fn nested_struct_fields_are_extracted() {
        let model = parse_default(SAMPLE).unwrap();
        let flags = &model.struct_definitions["BraceWrappingFlags"];
        assert_eq!(flags.fields.len(), 1);
        assert_eq!(flags.fields[0].name, "AfterClass");
        assert_eq!(flags.fields[0].description, "Wrap classes.");
        assert_eq!(model.field("BraceWrapping").unwrap().kind, FieldKind::Custom);
        assert!(model.field("AfterClass").is_none());
    }

    #[test]
    fn skips_marker_and_unknown_types() {
        let model = parse_default(SAMPLE).unwrap();
        assert!(model.field("InheritsParentConfig").is_none());
        assert!(model.field("Thing").is_none());
        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Foo", "Bar", "SpaceMode", "BraceWrapping"]);
    }

    #[test]
    fn metadata_and_known_types() {
        let model = parse_default(SAMPLE).unwrap();
        assert_eq!(model.metadata.start_line, 4);
        assert_eq!(model.metadata.end_line, 34);
        assert_eq!(model.metadata.lines_scanned, 31);
        assert_eq!(model.known_types, ["BraceWrappingFlags", "Spacing"]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_default(SAMPLE).unwrap().to_json().unwrap();
        let second = parse_default(SAMPLE).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn single_line_enum() {
        let text = "struct FormatStyle {\n  enum Spacing { SP_Before, SP_After };\n};\n";
        let model = parse_default(text).unwrap();
        let values: Vec<_> = model.enum_definitions["Spacing"]
            .values
            .iter()
            .map(|v| (v.name.as_str(), v.line))
            .collect();
        assert_eq!(values, [("SP_Before", 2), ("SP_After", 2)]);
        assert!(model.fields.is_empty());
    }

    #[test]
    fn nothing_after_closing_line_is_extracted() {
        let text = "struct FormatStyle {\n  bool A;\n};\nbool B;\n";
        let model = parse_default(text).unwrap();
        assert_eq!(model.fields.len(), 1);
        assert_eq!(model.metadata.end_line, 3);
    }

    #[test]
    fn missing_struct() {
        let err = parse_default("struct Other {\n};\n").unwrap_err();
        assert!(matches!(err, Error::StructNotFound { lines_scanned: 2, .. }));
    }

    #[test]
    fn unterminated_struct() {
        let err = parse_default("struct FormatStyle {\n  bool A;\n  enum E {\n").unwrap_err();
        assert!(matches!(
            err,
            Error::UnterminatedStruct {
                start_line: 1,
                line: 3,
                depth: 2,
                ..
            }
        ));
    }

    #[test]
    fn extra_closing_brace_is_rejected() {
        let text = "struct FormatStyle {\n  bool A;\n  }\n  bool B;\n};\n";
        let err = parse_default(text).unwrap_err();
        assert!(matches!(err, Error::DepthViolation { line: 3, .. }));
    }

    #[test]
    fn stray_terminator_inside_body_is_rejected() {
        let text = "struct FormatStyle {\n  bool A;\n  enum E {\n    E_X,\n  };\n  };\n  bool B;\n};\n";
        let err = parse_default(text).unwrap_err();
        assert!(matches!(err, Error::DepthViolation { line: 6, depth: 0 }));
    }

    #[test]
    fn operator_declarations_are_not_fields() {
        let text = "struct FormatStyle {\n  bool A;\n  bool operator==(const FormatStyle &R) const;\n};\n";
        let model = parse_default(text).unwrap();
        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A"]);
    }

    #[test]
    fn orphaned_docs_are_dropped_at_unmatched_lines() {
        let text = "struct FormatStyle {\n  /// Orphan.\n  void reset();\n  bool A;\n};\n";
        let model = parse_default(text).unwrap();
        assert_eq!(model.field("A").unwrap().description, "");
    }

    #[test]
    fn blank_lines_keep_pending_docs() {
        let text = "struct FormatStyle {\n  /// Kept.\n\n  bool A;\n};\n";
        let model = parse_default(text).unwrap();
        assert_eq!(model.field("A").unwrap().description, "Kept.");
    }

    const FORWARD: &str = "struct FormatStyle {\n  spacing Mode;\n  enum spacing {\n    S_A,\n  };\n  spacing Again;\n};\n";

    #[test]
    fn forward_reference_needs_heuristic_by_default() {
        let model = parse_default(FORWARD).unwrap();
        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Again"]);
    }

    #[test]
    fn forward_reference_resolved_with_prepass() {
        let options = ParseOptions {
            resolve_forward_refs: true,
            ..ParseOptions::default()
        };
        let model = parse(FORWARD, &options).unwrap();
        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Mode", "Again"]);
    }

    #[test]
    fn custom_target_struct() {
        let options = ParseOptions {
            target: "Options".to_string(),
            ..ParseOptions::default()
        };
        let model = parse("struct Options {\n  bool Enabled;\n};\n", &options).unwrap();
        assert_eq!(model.fields[0].name, "Enabled");
    }
}
