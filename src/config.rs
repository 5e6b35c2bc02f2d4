//! Style configuration: a user's chosen subset of options, validated
//! against an extracted model and written as a `.clang-format` document or
//! an inline `--style=` argument.

use crate::error::{Error, Result};
use crate::model::{Field, FieldKind, StyleModel};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A validated option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Enumerator in config spelling, e.g. `Allman`.
    Ident(String),
    Str(String),
    List(Vec<String>),
    /// Types the extractor does not understand are passed through.
    Raw(String),
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Ident(s) | Value::Str(s) | Value::Raw(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub option: String,
    /// Member of a nested struct option, as in `BraceWrapping.AfterClass`.
    pub child: Option<String>,
    pub value: Value,
}

impl Setting {
    fn key(&self) -> String {
        match &self.child {
            Some(child) => format!("{}.{}", self.option, child),
            None => self.option.clone(),
        }
    }
}

/// Ordered selection of options. Setting the same key twice keeps the
/// first position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleConfig {
    settings: Vec<Setting>,
}

impl StyleConfig {
    /// Build from `KEY=VALUE` strings.
    pub fn from_assignments<S: AsRef<str>>(model: &StyleModel, assignments: &[S]) -> Result<Self> {
        let mut config = Self::default();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment.split_once('=').ok_or_else(|| Error::InvalidValue {
                option: assignment.to_string(),
                value: String::new(),
                reason: "expected KEY=VALUE".to_string(),
            })?;
            config.set(model, key.trim(), value.trim())?;
        }
        Ok(config)
    }

    pub fn set(&mut self, model: &StyleModel, key: &str, raw: &str) -> Result<()> {
        let (option, child) = match key.split_once('.') {
            Some((option, child)) => (option, Some(child)),
            None => (key, None),
        };

        let top = model
            .field(option)
            .ok_or_else(|| Error::UnknownOption(key.to_string()))?;
        let field = match child {
            Some(child) => model
                .struct_for(top)
                .and_then(|def| def.field(child))
                .ok_or_else(|| Error::UnknownOption(key.to_string()))?,
            None => top,
        };

        let setting = Setting {
            option: option.to_string(),
            child: child.map(str::to_string),
            value: coerce(model, key, field, raw)?,
        };

        match self.settings.iter_mut().find(|s| s.key() == setting.key()) {
            Some(existing) => existing.value = setting.value,
            None => self.settings.push(setting),
        }
        Ok(())
    }

    #[cfg(test)]
    fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Settings grouped by top-level option, in first-seen order.
    fn grouped(&self) -> Vec<(&str, Vec<&Setting>)> {
        let mut groups: Vec<(&str, Vec<&Setting>)> = Vec::new();
        for setting in &self.settings {
            match groups.iter_mut().find(|(name, _)| *name == setting.option) {
                Some((_, members)) => members.push(setting),
                None => groups.push((&setting.option, vec![setting])),
            }
        }
        groups
    }

    /// `.clang-format` YAML document.
    pub fn to_yaml(&self) -> Result<String> {
        let body = if self.is_empty() {
            String::new()
        } else {
            serde_yml::to_string(self)?
        };
        let mut out = String::from("---\n");
        out.push_str(body.strip_prefix("---\n").unwrap_or(&body));
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("...\n");
        Ok(out)
    }

    /// Single-line flow mapping for `clang-format --style=`. JSON is a
    /// subset of YAML flow syntax, so values are quoted the JSON way.
    pub fn to_inline(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Top-level options in first-seen order; struct options become nested
/// mappings of their members.
impl Serialize for StyleConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let groups = self.grouped();
        let mut map = serializer.serialize_map(Some(groups.len()))?;
        for (option, members) in &groups {
            if members.iter().any(|s| s.child.is_some()) {
                map.serialize_entry(option, &Members(members))?;
            } else if let Some(setting) = members.last() {
                map.serialize_entry(option, &setting.value)?;
            }
        }
        map.end()
    }
}

struct Members<'a>(&'a [&'a Setting]);

impl Serialize for Members<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for setting in self.0 {
            if let Some(child) = &setting.child {
                map.serialize_entry(child, &setting.value)?;
            }
        }
        map.end()
    }
}

fn invalid(option: &str, raw: &str, reason: impl Into<String>) -> Error {
    Error::InvalidValue {
        option: option.to_string(),
        value: raw.to_string(),
        reason: reason.into(),
    }
}

fn coerce(model: &StyleModel, option: &str, field: &Field, raw: &str) -> Result<Value> {
    match field.kind {
        FieldKind::Boolean => parse_bool(option, raw),
        FieldKind::Integer => parse_int(option, raw),
        FieldKind::Unsigned => parse_unsigned(option, raw),
        FieldKind::String => Ok(Value::Str(raw.to_string())),
        FieldKind::StringList | FieldKind::List => Ok(Value::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        FieldKind::Optional => {
            let inner = field
                .ty
                .strip_prefix("std::optional<")
                .and_then(|s| s.strip_suffix('>'))
                .unwrap_or_default();
            match inner {
                "bool" => parse_bool(option, raw),
                "int" => parse_int(option, raw),
                "unsigned" => parse_unsigned(option, raw),
                _ => Ok(Value::Raw(raw.to_string())),
            }
        }
        FieldKind::Custom => {
            if let Some(def) = model.enum_for(field) {
                return def
                    .find(raw)
                    .map(|v| Value::Ident(v.config_name().to_string()))
                    .ok_or_else(|| {
                        let choices: Vec<&str> = def.values.iter().map(|v| v.config_name()).collect();
                        invalid(option, raw, format!("expected one of {}", choices.join(", ")))
                    });
            }
            if model.struct_for(field).is_some() {
                return Err(invalid(
                    option,
                    raw,
                    format!("{} is a nested struct; set its members as {}.<Member>", field.ty, option),
                ));
            }
            Ok(Value::Raw(raw.to_string()))
        }
    }
}

fn parse_bool(option: &str, raw: &str) -> Result<Value> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ => Err(invalid(option, raw, "expected true or false")),
    }
}

fn parse_int(option: &str, raw: &str) -> Result<Value> {
    raw.parse::<i64>()
        .map(Value::Int)
        .map_err(|_| invalid(option, raw, "expected an integer"))
}

fn parse_unsigned(option: &str, raw: &str) -> Result<Value> {
    raw.parse::<u32>()
        .map(|n| Value::Int(i64::from(n)))
        .map_err(|_| invalid(option, raw, "expected a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};
    use serde_json::json;

    const HEADER: &str = r#"struct FormatStyle {
  int AccessModifierOffset;
  unsigned ColumnLimit;
  std::string CommentPragmas;
  std::vector<std::string> ForEachMacros;
  std::optional<unsigned> BracedInitializerIndentWidth;
  enum BraceBreakingStyle : int8_t {
    BS_Attach,
    BS_Allman,
  };
  BraceBreakingStyle BreakBeforeBraces;
  struct BraceWrappingFlags {
    bool AfterClass;
    bool AfterEnum;
  };
  BraceWrappingFlags BraceWrapping;
  bool SortUsingDeclarations;
  ExternalStyle Thing;
};
"#;

    fn model() -> StyleModel {
        parse(HEADER, &ParseOptions::default()).unwrap()
    }

    fn read_yaml(text: &str) -> serde_json::Value {
        serde_yml::from_str(text).unwrap()
    }

    #[test]
    fn yaml_document() {
        let model = model();
        let config = StyleConfig::from_assignments(
            &model,
            &[
                "ColumnLimit=100",
                "BreakBeforeBraces=BS_Allman",
                "BraceWrapping.AfterClass=true",
                "ForEachMacros=foreach, Q_FOREACH",
                "BraceWrapping.AfterEnum=false",
            ],
        )
        .unwrap();
        let yaml = config.to_yaml().unwrap();

        assert!(yaml.starts_with("---\nColumnLimit: 100\nBreakBeforeBraces: Allman\n"), "{yaml}");
        assert!(yaml.contains("BraceWrapping:\n  AfterClass: true\n  AfterEnum: false\n"), "{yaml}");
        assert!(yaml.ends_with("...\n"));
        assert_eq!(
            read_yaml(&yaml),
            json!({
                "ColumnLimit": 100,
                "BreakBeforeBraces": "Allman",
                "BraceWrapping": {"AfterClass": true, "AfterEnum": false},
                "ForEachMacros": ["foreach", "Q_FOREACH"],
            })
        );
    }

    #[test]
    fn empty_yaml_document() {
        assert_eq!(StyleConfig::default().to_yaml().unwrap(), "---\n...\n");
    }

    #[test]
    fn inline_style() {
        let model = model();
        let config = StyleConfig::from_assignments(
            &model,
            &["BreakBeforeBraces=Allman", "BraceWrapping.AfterClass=TRUE", "CommentPragmas=it's"],
        )
        .unwrap();
        assert_eq!(
            config.to_inline().unwrap(),
            r#"{"BreakBeforeBraces":"Allman","BraceWrapping":{"AfterClass":true},"CommentPragmas":"it's"}"#
        );
    }

    #[test]
    fn separators_in_values_stay_inside_the_value() {
        let model = model();
        let mut config = StyleConfig::default();
        config.set(&model, "Thing", "a: b").unwrap();
        config.set(&model, "CommentPragmas", "x, ColumnLimit: 5").unwrap();

        let expected = json!({"Thing": "a: b", "CommentPragmas": "x, ColumnLimit: 5"});
        assert_eq!(read_yaml(&config.to_yaml().unwrap()), expected);
        let inline: serde_json::Value = serde_json::from_str(&config.to_inline().unwrap()).unwrap();
        assert_eq!(inline, expected);
        assert!(inline.get("ColumnLimit").is_none());
    }

    #[test]
    fn later_assignment_wins() {
        let model = model();
        let config =
            StyleConfig::from_assignments(&model, &["ColumnLimit=80", "ColumnLimit=120"]).unwrap();
        assert_eq!(config.settings().len(), 1);
        assert_eq!(config.settings()[0].value, Value::Int(120));
    }

    #[test]
    fn optional_uses_inner_type() {
        let model = model();
        let mut config = StyleConfig::default();
        config.set(&model, "BracedInitializerIndentWidth", "4").unwrap();
        assert!(config.set(&model, "BracedInitializerIndentWidth", "-1").is_err());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let model = model();
        let mut config = StyleConfig::default();
        assert!(matches!(
            config.set(&model, "NoSuchOption", "1"),
            Err(Error::UnknownOption(_))
        ));
        assert!(matches!(
            config.set(&model, "BraceWrapping.AfterNothing", "true"),
            Err(Error::UnknownOption(_))
        ));
        assert!(matches!(
            config.set(&model, "ColumnLimit.Child", "1"),
            Err(Error::UnknownOption(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let model = model();
        let mut config = StyleConfig::default();
        assert!(config.set(&model, "SortUsingDeclarations", "yes").is_err());
        assert!(config.set(&model, "ColumnLimit", "-5").is_err());
        assert!(config.set(&model, "AccessModifierOffset", "-2").is_ok());
        assert!(config.set(&model, "BreakBeforeBraces", "GNU").is_err());
        assert!(config.set(&model, "BraceWrapping", "true").is_err());
        assert!(config.set(&model, "ColumnLimit", "").is_err());
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        let model = model();
        assert!(StyleConfig::from_assignments(&model, &["ColumnLimit"]).is_err());
    }
}
