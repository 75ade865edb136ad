// Strongly-typed raw configuration values. Format-specific `Value` types from
// serde_json / serde_yaml / toml never leak past the `formats` module.

use indexmap::IndexMap;

/// Nested mapping with insertion order preserved; key order drives field order
/// in inferred records.
pub type Mapping = IndexMap<String, ConfigValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// TOML date-times survive loading so the inferencer can reject them with
    /// the offending key path instead of a parse-time error.
    Datetime(String),
    Sequence(Vec<ConfigValue>),
    Mapping(Mapping),
}

impl ConfigValue {
    /// Kind name used in error messages and inference diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Datetime(_) => "datetime",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_preserves_insertion_order() {
        let mut map = Mapping::new();
        map.insert("z".into(), ConfigValue::Integer(1));
        map.insert("a".into(), ConfigValue::Integer(2));
        map.insert("m".into(), ConfigValue::Integer(3));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ConfigValue::Null.kind(), "null");
        assert_eq!(ConfigValue::Float(1.5).kind(), "float");
        assert_eq!(ConfigValue::Sequence(vec![]).kind(), "sequence");
        assert_eq!(ConfigValue::Datetime("1979-05-27".into()).kind(), "datetime");
    }
}
