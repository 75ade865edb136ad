//! Format loader/writer registry.
//!
//! A closed enum keyed by file extension replaces the usual stringly-typed
//! `load_<ext>` lookup: every match on [`Format`] is checked exhaustively.
//! Conversions to and from the per-format `Value` types live here so the rest
//! of the crate only ever sees [`ConfigValue`].

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::value::{ConfigValue, Mapping};

/// Extensions the registry recognizes, in registry order.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["yaml", "yml", "json", "jsn", "toml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" | "jsn" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Pick a format from a path's extension, or fail naming the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| Error::NotSupportedFormat(ext.to_string()))
    }

    /// Load a file into a mapping. The top-level document must be a mapping.
    pub fn load(self, path: &Path) -> Result<Mapping> {
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let value = match self {
            Self::Yaml => {
                let doc: serde_yaml::Value = serde_yaml::from_str(&source)
                    .map_err(|e| Error::parse(path, e.to_string()))?;
                from_yaml(doc).map_err(|msg| Error::parse(path, msg))?
            }
            Self::Json => {
                // serde_path_to_error keeps the JSON path of the failure.
                let de = &mut serde_json::Deserializer::from_str(&source);
                let doc: serde_json::Value = serde_path_to_error::deserialize(de)
                    .map_err(|e| {
                        let at = e.path().to_string();
                        Error::parse(path, format!("at JSON path {at} -> {}", e.into_inner()))
                    })?;
                from_json(doc)
            }
            Self::Toml => {
                let doc: toml::Value =
                    toml::from_str(&source).map_err(|e| Error::parse(path, e.to_string()))?;
                from_toml(doc)
            }
        };
        match value {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(Error::parse(
                path,
                format!("top-level value must be a mapping, found {}", other.kind()),
            )),
        }
    }

    /// Serialize a mapping and write it, truncating any previous content.
    /// Missing parent directories are created first.
    pub fn write(self, path: &Path, map: &Mapping) -> Result<()> {
        let rendered = match self {
            Self::Yaml => serde_yaml::to_string(&to_yaml(&ConfigValue::Mapping(map.clone())))
                .map_err(|e| Error::Emit {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?,
            Self::Json => {
                let mut out =
                    serde_json::to_string_pretty(&to_json(&ConfigValue::Mapping(map.clone())))
                        .map_err(|e| Error::Emit {
                            path: path.to_path_buf(),
                            message: e.to_string(),
                        })?;
                out.push('\n');
                out
            }
            Self::Toml => {
                let doc = to_toml(&ConfigValue::Mapping(map.clone())).map_err(|msg| Error::Emit {
                    path: path.to_path_buf(),
                    message: msg,
                })?;
                toml::to_string_pretty(&doc).map_err(|e| Error::Emit {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
            }
        };
        create_parent_dirs(path)?;
        fs::write(path, rendered).map_err(|e| Error::io(path, e))
    }
}

/// Dispatch [`Format::load`] on the path's extension.
pub fn load_path(path: &Path) -> Result<Mapping> {
    Format::from_path(path)?.load(path)
}

/// Dispatch [`Format::write`] on the path's extension.
pub fn write_path(path: &Path, map: &Mapping) -> Result<()> {
    Format::from_path(path)?.write(path, map)
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// JSON
// ————————————————————————————————————————————————————————————————————————————

fn from_json(value: serde_json::Value) -> ConfigValue {
    match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(b) => ConfigValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ConfigValue::Integer(i)
            } else {
                // u64 beyond i64::MAX or a float: widen to f64
                ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => ConfigValue::String(s),
        serde_json::Value::Array(items) => {
            ConfigValue::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(obj) => {
            let mut map = Mapping::new();
            for (k, v) in obj {
                map.insert(k, from_json(v));
            }
            ConfigValue::Mapping(map)
        }
    }
}

fn to_json(value: &ConfigValue) -> serde_json::Value {
    match value {
        ConfigValue::Null => serde_json::Value::Null,
        ConfigValue::Bool(b) => serde_json::Value::Bool(*b),
        ConfigValue::Integer(i) => serde_json::Value::from(*i),
        ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ConfigValue::String(s) => serde_json::Value::from(s.clone()),
        ConfigValue::Datetime(s) => serde_json::Value::from(s.clone()),
        ConfigValue::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        ConfigValue::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                obj.insert(k.clone(), to_json(v));
            }
            serde_json::Value::Object(obj)
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// YAML
// ————————————————————————————————————————————————————————————————————————————

fn from_yaml(value: serde_yaml::Value) -> std::result::Result<ConfigValue, String> {
    match value {
        serde_yaml::Value::Null => Ok(ConfigValue::Null),
        serde_yaml::Value::Bool(b) => Ok(ConfigValue::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ConfigValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(ConfigValue::Float(f))
            } else {
                Err(format!("unrepresentable number `{n:?}`"))
            }
        }
        serde_yaml::Value::String(s) => Ok(ConfigValue::String(s)),
        serde_yaml::Value::Sequence(items) => Ok(ConfigValue::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        )),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Mapping::new();
            for (k, v) in mapping {
                let serde_yaml::Value::String(key) = k else {
                    return Err("mapping keys must be strings".to_string());
                };
                map.insert(key, from_yaml(v)?);
            }
            Ok(ConfigValue::Mapping(map))
        }
        serde_yaml::Value::Tagged(tagged) => {
            Err(format!("tagged value `{}` is not supported", tagged.tag))
        }
    }
}

fn to_yaml(value: &ConfigValue) -> serde_yaml::Value {
    match value {
        ConfigValue::Null => serde_yaml::Value::Null,
        ConfigValue::Bool(b) => serde_yaml::Value::Bool(*b),
        ConfigValue::Integer(i) => serde_yaml::Value::Number(serde_yaml::Number::from(*i)),
        ConfigValue::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        ConfigValue::String(s) => serde_yaml::Value::String(s.clone()),
        ConfigValue::Datetime(s) => serde_yaml::Value::String(s.clone()),
        ConfigValue::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect())
        }
        ConfigValue::Mapping(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (k, v) in map {
                out.insert(serde_yaml::Value::String(k.clone()), to_yaml(v));
            }
            serde_yaml::Value::Mapping(out)
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TOML
// ————————————————————————————————————————————————————————————————————————————

fn from_toml(value: toml::Value) -> ConfigValue {
    match value {
        toml::Value::String(s) => ConfigValue::String(s),
        toml::Value::Integer(i) => ConfigValue::Integer(i),
        toml::Value::Float(f) => ConfigValue::Float(f),
        toml::Value::Boolean(b) => ConfigValue::Bool(b),
        toml::Value::Datetime(d) => ConfigValue::Datetime(d.to_string()),
        toml::Value::Array(items) => {
            ConfigValue::Sequence(items.into_iter().map(from_toml).collect())
        }
        toml::Value::Table(table) => {
            let mut map = Mapping::new();
            for (k, v) in table {
                map.insert(k, from_toml(v));
            }
            ConfigValue::Mapping(map)
        }
    }
}

fn to_toml(value: &ConfigValue) -> std::result::Result<toml::Value, String> {
    match value {
        // TOML has no null
        ConfigValue::Null => Err("TOML cannot represent null".to_string()),
        ConfigValue::Bool(b) => Ok(toml::Value::Boolean(*b)),
        ConfigValue::Integer(i) => Ok(toml::Value::Integer(*i)),
        ConfigValue::Float(f) => Ok(toml::Value::Float(*f)),
        ConfigValue::String(s) => Ok(toml::Value::String(s.clone())),
        ConfigValue::Datetime(s) => Ok(match s.parse::<toml::value::Datetime>() {
            Ok(d) => toml::Value::Datetime(d),
            Err(_) => toml::Value::String(s.clone()),
        }),
        ConfigValue::Sequence(items) => Ok(toml::Value::Array(
            items
                .iter()
                .map(to_toml)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        )),
        ConfigValue::Mapping(map) => {
            // Tables must follow plain values at every level; hoist non-table
            // entries first so the serializer never sees a value after a table.
            let mut table = toml::value::Table::new();
            for (k, v) in map.iter().filter(|(_, v)| !v.is_mapping()) {
                table.insert(k.clone(), to_toml(v)?);
            }
            for (k, v) in map.iter().filter(|(_, v)| v.is_mapping()) {
                table.insert(k.clone(), to_toml(v)?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
