//! Result assembler: collects extracted declarations in source order and
//! produces the final model once the struct has been closed.

use super::field::Declaration;
use super::registry::TypeRegistry;
use crate::model::{
    EnumDefinition, EnumValue, Field, Metadata, StructDefinition, StyleModel,
};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Assembler {
    fields: Vec<Field>,
    enums: BTreeMap<String, EnumDefinition>,
    structs: BTreeMap<String, StructDefinition>,
}

fn to_field(decl: Declaration, description: String, line: usize) -> Field {
    Field {
        ty: decl.ty,
        name: decl.name,
        kind: decl.kind,
        description,
        line,
    }
}

impl Assembler {
    pub fn begin_enum(&mut self, name: &str) {
        self.enums
            .entry(name.to_string())
            .or_insert_with(|| EnumDefinition::new(name));
    }

    pub fn begin_struct(&mut self, name: &str) {
        self.structs
            .entry(name.to_string())
            .or_insert_with(|| StructDefinition::new(name));
    }

    pub fn push_field(&mut self, decl: Declaration, description: String, line: usize) {
        self.fields.push(to_field(decl, description, line));
    }

    pub fn push_struct_field(
        &mut self,
        owner: &str,
        decl: Declaration,
        description: String,
        line: usize,
    ) {
        self.structs
            .entry(owner.to_string())
            .or_insert_with(|| StructDefinition::new(owner))
            .fields
            .push(to_field(decl, description, line));
    }

    pub fn push_enum_value(&mut self, owner: &str, name: String, description: String, line: usize) {
        self.enums
            .entry(owner.to_string())
            .or_insert_with(|| EnumDefinition::new(owner))
            .values
            .push(EnumValue {
                name,
                description,
                line,
            });
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn finish(
        self,
        registry: &TypeRegistry,
        source_file: &str,
        start_line: usize,
        end_line: usize,
    ) -> StyleModel {
        StyleModel {
            metadata: Metadata {
                source_file: source_file.to_string(),
                start_line,
                end_line,
                lines_scanned: end_line - start_line + 1,
                parser_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            known_types: registry.sorted(),
            enum_definitions: self.enums,
            struct_definitions: self.structs,
            fields: self.fields,
        }
    }
}
