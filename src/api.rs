//! Runtime support for generated records.
//!
//! Generated source imports everything it needs from this one module:
//! [`StructuredConfig`] is the round-trip contract, [`FromValue`]/[`ToValue`]
//! move scalars and nested records in and out of [`ConfigValue`], and
//! [`MappingExt`] does keyed field extraction with errors that name the field.

use std::path::Path;

pub use crate::error::{Error, Result};
pub use crate::value::{ConfigValue, Mapping};

use crate::{formats, tokens};

// ————————————————————————————————————————————————————————————————————————————
// VALUE CONVERSION
// ————————————————————————————————————————————————————————————————————————————

pub trait FromValue: Sized {
    fn from_value(value: &ConfigValue) -> Result<Self>;
}

pub trait ToValue {
    fn to_value(&self) -> ConfigValue;
}

fn mismatch<T>(expected: &'static str, found: &ConfigValue) -> Result<T> {
    Err(Error::TypeMismatch {
        expected,
        found: found.kind(),
    })
}

impl FromValue for String {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::String(s) => Ok(s.clone()),
            other => mismatch("string", other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Bool(b) => Ok(*b),
            other => mismatch("boolean", other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Integer(i) => Ok(*i),
            other => mismatch("integer", other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Float(f) => Ok(*f),
            // integers widen into float fields
            ConfigValue::Integer(i) => Ok(*i as f64),
            other => mismatch("float", other),
        }
    }
}

impl FromValue for Vec<ConfigValue> {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Sequence(items) => Ok(items.clone()),
            other => mismatch("sequence", other),
        }
    }
}

impl FromValue for ConfigValue {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::String(self.clone())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Bool(*self)
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Integer(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Float(*self)
    }
}

impl ToValue for Vec<ConfigValue> {
    fn to_value(&self) -> ConfigValue {
        ConfigValue::Sequence(self.clone())
    }
}

impl ToValue for ConfigValue {
    fn to_value(&self) -> ConfigValue {
        self.clone()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> ConfigValue {
        match self {
            Some(inner) => inner.to_value(),
            None => ConfigValue::Null,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MAPPING ACCESS
// ————————————————————————————————————————————————————————————————————————————

pub trait MappingExt {
    /// Extract a required field, failing with the key on absence or mismatch.
    fn field<T: FromValue>(&self, key: &str) -> Result<T>;
    /// Extract a lenient field: missing or null becomes `None`.
    fn field_opt<T: FromValue>(&self, key: &str) -> Result<Option<T>>;
}

impl MappingExt for Mapping {
    fn field<T: FromValue>(&self, key: &str) -> Result<T> {
        let value = self.get(key).ok_or_else(|| Error::MissingField {
            key: key.to_string(),
        })?;
        T::from_value(value).map_err(|e| e.in_field(key))
    }

    fn field_opt<T: FromValue>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(value) => T::from_value(value).map(Some).map_err(|e| e.in_field(key)),
        }
    }
}

/// View a value as a record container, for generated `FromValue` impls.
pub fn as_record(value: &ConfigValue) -> Result<&Mapping> {
    value.as_mapping().ok_or(Error::TypeMismatch {
        expected: "mapping",
        found: value.kind(),
    })
}

/// Root-unwrap rule: a single top-level entry whose value is a mapping stands
/// in for the whole document; anything else is taken as-is.
pub fn unwrap_root(mut map: Mapping) -> Mapping {
    if map.len() == 1 && map.values().next().is_some_and(ConfigValue::is_mapping) {
        if let Some((_, ConfigValue::Mapping(inner))) = map.pop() {
            return inner;
        }
    }
    map
}

// ————————————————————————————————————————————————————————————————————————————
// ROUND-TRIP CONTRACT
// ————————————————————————————————————————————————————————————————————————————

/// The contract every generated record satisfies: containers in, containers
/// out, with file endpoints dispatched through the format registry.
pub trait StructuredConfig: Sized {
    /// Build the record from a raw mapping, constructing nested records
    /// bottom-up. No field is ever left holding a raw mapping.
    fn from_container(map: &Mapping) -> Result<Self>;

    /// Dump back to a raw mapping, preserving recorded field order.
    fn to_container(&self) -> Mapping;

    /// Load via the format registry, optionally resolving tokens, then apply
    /// the root-unwrap rule and decode.
    fn from_file(path: impl AsRef<Path>, resolve: bool) -> Result<Self> {
        let map = formats::load_path(path.as_ref())?;
        let map = if resolve {
            tokens::resolve_mapping_env(&map).0
        } else {
            map
        };
        Self::from_container(&unwrap_root(map))
    }

    /// Inverse of [`StructuredConfig::from_file`]: dump, optionally resolve
    /// tokens, write through the format registry.
    fn to_file(&self, path: impl AsRef<Path>, resolve: bool) -> Result<()> {
        let map = self.to_container();
        let map = if resolve {
            tokens::resolve_mapping_env(&map).0
        } else {
            map
        };
        formats::write_path(path.as_ref(), &map)
    }
}

// ------------------------------- Tests ------------------------------------ //
