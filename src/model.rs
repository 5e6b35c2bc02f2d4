//! Data model for the extracted style surface: format-agnostic.

use crate::error;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Category of a field type, decided by the grammar form that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Boolean,
    Integer,
    Unsigned,
    String,
    StringList,
    List,
    Optional,
    Custom,
}

/// A configurable member of the target struct (or of a nested struct).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Verbatim source type token, e.g. `unsigned` or `std::vector<std::string>`
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub kind: FieldKind,
    /// `///` lines directly above the declaration, newline-joined
    pub description: String,
    pub line: usize,
}

/// A single named value of an enum declared inside the target struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub description: String,
    pub line: usize,
}

impl EnumValue {
    /// Spelling used in `.clang-format` files: `BS_Allman` → `Allman`.
    pub fn config_name(&self) -> &str {
        match self.name.split_once('_') {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.name,
        }
    }
}

/// Serialized as the bare ordered value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    pub values: Vec<EnumValue>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Look up a value by source spelling or by config spelling.
    pub fn find(&self, spelling: &str) -> Option<&EnumValue> {
        self.values
            .iter()
            .find(|v| v.name == spelling)
            .or_else(|| self.values.iter().find(|v| v.config_name() == spelling))
    }
}

impl Serialize for EnumDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Field list of a struct nested inside the target struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<Field>,
}

impl StructDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Serialize for StructDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub source_file: String,
    pub start_line: usize,
    pub end_line: usize,
    pub lines_scanned: usize,
    pub parser_version: String,
}

/// Complete extraction result for one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleModel {
    pub metadata: Metadata,
    /// Sorted
    pub known_types: Vec<String>,
    pub enum_definitions: BTreeMap<String, EnumDefinition>,
    pub struct_definitions: BTreeMap<String, StructDefinition>,
    pub fields: Vec<Field>,
}

impl StyleModel {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn enum_for(&self, field: &Field) -> Option<&EnumDefinition> {
        self.enum_definitions.get(&field.ty)
    }

    pub fn struct_for(&self, field: &Field) -> Option<&StructDefinition> {
        self.struct_definitions.get(&field.ty)
    }

    pub fn to_json(&self) -> error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
