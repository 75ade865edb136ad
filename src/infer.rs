//! Schema inference: walk a resolved, filtered mapping and build the record
//! forest that codegen serializes.
//!
//! The recursion is pure: each call returns the record for its level plus the
//! descendants it discovered, and the caller merges. No accumulator threads
//! through the call stack. Discovery order (children pushed before the record
//! that references them, root last) is also the emission order.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::value::{ConfigValue, Mapping};

/// Root record name when the top level has more than one entry and the
/// single-key unwrap rule does not apply.
pub const GENERIC_ROOT_NAME: &str = "Config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Bool,
    Float,
    Integer,
    Null,
    /// Sequences are opaque leaves, no per-element inference.
    Sequence,
    /// Reference to another record in the same forest, by name.
    Record(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Source key, used verbatim in generated containers.
    pub key: String,
    /// Sanitized Rust field identifier.
    pub ident: String,
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Forest-unique type name.
    pub name: String,
    /// Dotted source path, for diagnostics.
    pub path: String,
    /// Declaration order equals source key order.
    pub fields: Vec<FieldSpec>,
}

/// Every record discovered by one inference pass, children before the records
/// that reference them, root last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForest {
    records: Vec<RecordSpec>,
}

impl RecordForest {
    pub fn records(&self) -> &[RecordSpec] {
        &self.records
    }

    pub fn root(&self) -> &RecordSpec {
        self.records.last().expect("forest always holds the root")
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Infer the record forest for one top-level mapping.
///
/// Root selection: a single entry whose value is a mapping is unwrapped (its
/// key names the root); anything else gets the fixed [`GENERIC_ROOT_NAME`]
/// wrapper around the whole mapping.
pub fn infer(map: &Mapping) -> Result<RecordForest> {
    let (root, descendants) = match single_mapping_entry(map) {
        Some((key, content)) => infer_record(&pascal_case(key), content, key)?,
        None => infer_record(GENERIC_ROOT_NAME, map, "")?,
    };
    let mut records = descendants;
    records.push(root);

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.name.as_str()) {
            return Err(Error::DuplicateRecord {
                name: record.name.clone(),
                path: record.path.clone(),
            });
        }
    }
    Ok(RecordForest { records })
}

fn single_mapping_entry(map: &Mapping) -> Option<(&str, &Mapping)> {
    if map.len() != 1 {
        return None;
    }
    let (key, value) = map.iter().next()?;
    value.as_mapping().map(|content| (key.as_str(), content))
}

fn infer_record(name: &str, content: &Mapping, path: &str) -> Result<(RecordSpec, Vec<RecordSpec>)> {
    let mut fields = Vec::new();
    let mut discovered = Vec::new();

    for (key, value) in content {
        let field_path = join_path(path, key);
        let ty = match value {
            ConfigValue::Mapping(child) if !child.is_empty() => {
                let child_name = format!("{name}{}", pascal_case(key));
                let (child_record, grandchildren) =
                    infer_record(&child_name, child, &field_path)?;
                discovered.extend(grandchildren);
                discovered.push(child_record);
                FieldType::Record(child_name)
            }
            // Empty nested mappings are dropped entirely: no record, no
            // field. Source behavior, preserved as-is (see DESIGN.md).
            ConfigValue::Mapping(_) => continue,
            ConfigValue::String(_) => FieldType::Str,
            ConfigValue::Bool(_) => FieldType::Bool,
            ConfigValue::Float(_) => FieldType::Float,
            ConfigValue::Integer(_) => FieldType::Integer,
            ConfigValue::Null => FieldType::Null,
            ConfigValue::Sequence(_) => FieldType::Sequence,
            ConfigValue::Datetime(_) => {
                return Err(Error::Inference {
                    path: field_path,
                    found: "datetime",
                });
            }
        };
        fields.push(FieldSpec {
            key: key.clone(),
            ident: sanitize_ident(key),
            ty,
        });
    }

    Ok((
        RecordSpec {
            name: name.to_string(),
            path: path.to_string(),
            fields,
        },
        discovered,
    ))
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NAME SANITIZATION
// ————————————————————————————————————————————————————————————————————————————

const KEYWORDS: [&str; 38] = [
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "union", "unsafe", "use", "where", "while",
];

/// PascalCase a source key for use as (part of) a record name.
pub fn pascal_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = true;
    for c in key.chars() {
        if c.is_alphanumeric() {
            if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        } else {
            upper_next = true;
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push_str("Unnamed");
    }
    out
}

/// snake_case a source key for use as a Rust field identifier. The generated
/// containers always use the original key, so this never affects round trips.
pub fn sanitize_ident(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push_str("field");
    }
    if KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

// ------------------------------- Tests ------------------------------------ //
