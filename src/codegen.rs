//! Serialize a record forest into Rust source implementing the round-trip
//! contract, and write it out.
//!
//! Output is fully deterministic: same forest, same text. Records are emitted
//! in forest order, which is discovery order, so every record appears before
//! the records that reference it. Writes are truncate-and-replace, never
//! append, so regenerating over an unchanged input is byte-identical.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::create_parent_dirs;
use crate::infer::{FieldType, RecordForest, RecordSpec};

const HEADER: &str = "// Generated by config-typegen. Do not edit by hand.";
const IMPORTS: &str = "use config_typegen::api::{self, ConfigValue, FromValue, Mapping, MappingExt, Result, StructuredConfig, ToValue};";

pub struct Codegen {
    init_none: bool,
    blocks: Vec<String>,
}

impl Codegen {
    pub fn new(init_none: bool) -> Self {
        Self {
            init_none,
            blocks: Vec::new(),
        }
    }

    pub fn emit(&mut self, forest: &RecordForest) {
        for record in forest.records() {
            self.emit_record(record);
        }
    }

    pub fn into_string(self) -> String {
        let mut out = String::new();
        out.push_str(HEADER);
        out.push_str("\n\n");
        out.push_str(IMPORTS);
        out.push('\n');
        for block in &self.blocks {
            out.push('\n');
            out.push_str(block);
        }
        out
    }

    fn emit_record(&mut self, record: &RecordSpec) {
        let mut b = String::new();
        let name = &record.name;
        let derive = if self.init_none {
            "#[derive(Debug, Clone, PartialEq, Default)]"
        } else {
            "#[derive(Debug, Clone, PartialEq)]"
        };

        // struct declaration
        let _ = writeln!(b, "{derive}");
        if record.fields.is_empty() {
            let _ = writeln!(b, "pub struct {name} {{}}");
        } else {
            let _ = writeln!(b, "pub struct {name} {{");
            for field in &record.fields {
                let _ = writeln!(b, "    pub {}: {},", field.ident, self.rust_type(&field.ty));
            }
            let _ = writeln!(b, "}}");
        }
        let _ = writeln!(b);

        // round-trip impl
        let _ = writeln!(b, "impl StructuredConfig for {name} {{");
        if record.fields.is_empty() {
            let _ = writeln!(b, "    fn from_container(_map: &Mapping) -> Result<Self> {{");
            let _ = writeln!(b, "        Ok(Self {{}})");
            let _ = writeln!(b, "    }}");
            let _ = writeln!(b);
            let _ = writeln!(b, "    fn to_container(&self) -> Mapping {{");
            let _ = writeln!(b, "        Mapping::new()");
            let _ = writeln!(b, "    }}");
        } else {
            let _ = writeln!(b, "    fn from_container(map: &Mapping) -> Result<Self> {{");
            let _ = writeln!(b, "        Ok(Self {{");
            for field in &record.fields {
                let accessor = if self.init_none && field.ty != FieldType::Null {
                    "field_opt"
                } else {
                    "field"
                };
                let _ = writeln!(
                    b,
                    "            {}: map.{accessor}(\"{}\")?,",
                    field.ident, field.key
                );
            }
            let _ = writeln!(b, "        }})");
            let _ = writeln!(b, "    }}");
            let _ = writeln!(b);
            let _ = writeln!(b, "    fn to_container(&self) -> Mapping {{");
            let _ = writeln!(b, "        let mut map = Mapping::new();");
            for field in &record.fields {
                let _ = writeln!(
                    b,
                    "        map.insert(\"{}\".into(), self.{}.to_value());",
                    field.key, field.ident
                );
            }
            let _ = writeln!(b, "        map");
            let _ = writeln!(b, "    }}");
        }
        let _ = writeln!(b, "}}");
        let _ = writeln!(b);

        // value conversions so records nest uniformly
        let _ = writeln!(b, "impl FromValue for {name} {{");
        let _ = writeln!(b, "    fn from_value(value: &ConfigValue) -> Result<Self> {{");
        let _ = writeln!(b, "        Self::from_container(api::as_record(value)?)");
        let _ = writeln!(b, "    }}");
        let _ = writeln!(b, "}}");
        let _ = writeln!(b);
        let _ = writeln!(b, "impl ToValue for {name} {{");
        let _ = writeln!(b, "    fn to_value(&self) -> ConfigValue {{");
        let _ = writeln!(b, "        ConfigValue::Mapping(self.to_container())");
        let _ = writeln!(b, "    }}");
        let _ = writeln!(b, "}}");

        self.blocks.push(b);
    }

    fn rust_type(&self, ty: &FieldType) -> String {
        let base = match ty {
            FieldType::Str => "String".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::Float => "f64".to_string(),
            FieldType::Integer => "i64".to_string(),
            FieldType::Null => return "Option<ConfigValue>".to_string(),
            FieldType::Sequence => "Vec<ConfigValue>".to_string(),
            FieldType::Record(name) => name.clone(),
        };
        if self.init_none {
            format!("Option<{base}>")
        } else {
            base
        }
    }
}

/// Emit the whole forest as one source file.
pub fn emit(forest: &RecordForest, init_none: bool) -> String {
    let mut cg = Codegen::new(init_none);
    cg.emit(forest);
    cg.into_string()
}

/// Truncate-and-replace write, creating parent directories on demand.
pub fn write(source: &str, path: &Path) -> Result<()> {
    create_parent_dirs(path)?;
    fs::write(path, source).map_err(|e| Error::io(path, e))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::infer;
    use crate::value::{ConfigValue, Mapping};

    fn map(entries: Vec<(&str, ConfigValue)>) -> Mapping {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn flat_config_emits_exact_source() {
        let top = map(vec![
            ("a", ConfigValue::Integer(1)),
            ("b", ConfigValue::String("x".into())),
        ]);
        let forest = infer(&top).unwrap();
        let source = emit(&forest, false);

        let expected = r#"// Generated by config-typegen. Do not edit by hand.

use config_typegen::api::{self, ConfigValue, FromValue, Mapping, MappingExt, Result, StructuredConfig, ToValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub a: i64,
    pub b: String,
}

impl StructuredConfig for Config {
    fn from_container(map: &Mapping) -> Result<Self> {
        Ok(Self {
            a: map.field("a")?,
            b: map.field("b")?,
        })
    }

    fn to_container(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("a".into(), self.a.to_value());
        map.insert("b".into(), self.b.to_value());
        map
    }
}

impl FromValue for Config {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Self::from_container(api::as_record(value)?)
    }
}

impl ToValue for Config {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Mapping(self.to_container())
    }
}
"#;
        assert_eq!(source, expected);
    }

    #[test]
    fn nested_records_emit_children_before_parents() {
        let creds = map(vec![("user", ConfigValue::String("u".into()))]);
        let db = map(vec![
            ("host", ConfigValue::String("h".into())),
            ("credentials", ConfigValue::Mapping(creds)),
        ]);
        let app = map(vec![("database", ConfigValue::Mapping(db))]);
        let top = map(vec![("app", ConfigValue::Mapping(app))]);

        let source = emit(&infer(&top).unwrap(), false);
        let creds_at = source.find("pub struct AppDatabaseCredentials").unwrap();
        let db_at = source.find("pub struct AppDatabase {").unwrap();
        let app_at = source.find("pub struct App {").unwrap();
        assert!(creds_at < db_at && db_at < app_at);
        assert!(source.contains("pub credentials: AppDatabaseCredentials,"));
        assert!(source.contains("credentials: map.field(\"credentials\")?,"));
    }

    #[test]
    fn init_none_makes_fields_optional_with_default() {
        let top = map(vec![
            ("a", ConfigValue::Integer(1)),
            ("n", ConfigValue::Null),
        ]);
        let source = emit(&infer(&top).unwrap(), true);
        assert!(source.contains("#[derive(Debug, Clone, PartialEq, Default)]"));
        assert!(source.contains("pub a: Option<i64>,"));
        // null-tagged fields are already optional, no double wrap
        assert!(source.contains("pub n: Option<ConfigValue>,"));
        assert!(source.contains("a: map.field_opt(\"a\")?,"));
        assert!(source.contains("n: map.field(\"n\")?,"));
    }

    #[test]
    fn emission_is_deterministic() {
        let top = map(vec![
            ("x", ConfigValue::Float(0.5)),
            ("y", ConfigValue::Sequence(vec![ConfigValue::Integer(1)])),
        ]);
        let forest = infer(&top).unwrap();
        assert_eq!(emit(&forest, false), emit(&forest, false));
    }

    #[test]
    fn sanitized_idents_keep_source_keys_in_containers() {
        let top = map(vec![
            ("type", ConfigValue::String("x".into())),
            ("cacheSize", ConfigValue::Integer(1)),
        ]);
        let source = emit(&infer(&top).unwrap(), false);
        assert!(source.contains("pub type_: String,"));
        assert!(source.contains("type_: map.field(\"type\")?,"));
        assert!(source.contains("pub cache_size: i64,"));
        assert!(source.contains("map.insert(\"cacheSize\".into(), self.cache_size.to_value());"));
    }

    #[test]
    fn write_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen/out.rs");

        write("short", &path).unwrap();
        write("x", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }
}
