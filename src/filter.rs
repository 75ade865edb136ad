//! Ignore filter: drop configuration entries addressed by dotted paths.
//!
//! Works on a flattened view: mappings are expanded into dot-joined leaf
//! paths, matching entries are removed, and the survivors are regrouped into
//! nested form. Prefixes whose leaves were all removed vanish entirely; a
//! path that matches nothing is a recorded no-op, never an error.

use indexmap::IndexMap;

use crate::value::{ConfigValue, Mapping};

/// Flat view keyed by dot-joined path segments. Sequences and scalars are
/// leaves; only mappings are expanded, so an empty mapping contributes no
/// entries at all.
pub type FlatMapping = IndexMap<String, ConfigValue>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IgnoreReport {
    pub removed: Vec<String>,
    /// Ignore paths that addressed no flattened entry.
    pub unmatched: Vec<String>,
}

/// Remove every entry addressed by `ignore` and regroup the rest, preserving
/// the relative order in which prefixes first appeared.
pub fn apply_ignore(map: &Mapping, ignore: &[String]) -> (Mapping, IgnoreReport) {
    let mut flat = flatten(map);
    let mut report = IgnoreReport::default();
    for path in ignore {
        if flat.shift_remove(path).is_some() {
            report.removed.push(path.clone());
        } else {
            report.unmatched.push(path.clone());
        }
    }
    (unflatten(&flat), report)
}

pub fn flatten(map: &Mapping) -> FlatMapping {
    let mut flat = FlatMapping::new();
    flatten_into(map, "", &mut flat);
    flat
}

fn flatten_into(map: &Mapping, prefix: &str, flat: &mut FlatMapping) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            ConfigValue::Mapping(child) => flatten_into(child, &path, flat),
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}

pub fn unflatten(flat: &FlatMapping) -> Mapping {
    let mut out = Mapping::new();
    for (path, value) in flat {
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut out, &segments, value.clone());
    }
    out
}

fn insert_path(map: &mut Mapping, segments: &[&str], value: ConfigValue) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| ConfigValue::Mapping(Mapping::new()));
            // flatten output never mixes a leaf and a prefix under one path
            if let ConfigValue::Mapping(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Mapping {
        let mut a = Mapping::new();
        a.insert("b".into(), ConfigValue::Integer(1));
        a.insert("c".into(), ConfigValue::Integer(2));
        let mut map = Mapping::new();
        map.insert("a".into(), ConfigValue::Mapping(a));
        map
    }

    #[test]
    fn removes_one_leaf_and_keeps_siblings() {
        let (out, report) = apply_ignore(&nested(), &["a.b".to_string()]);
        assert_eq!(report.removed, vec!["a.b".to_string()]);
        assert!(report.unmatched.is_empty());

        let ConfigValue::Mapping(a) = &out["a"] else {
            panic!("expected mapping");
        };
        assert_eq!(a.len(), 1);
        assert_eq!(a["c"], ConfigValue::Integer(2));
    }

    #[test]
    fn emptied_wrapper_vanishes() {
        let mut a = Mapping::new();
        a.insert("b".into(), ConfigValue::Integer(1));
        let mut map = Mapping::new();
        map.insert("a".into(), ConfigValue::Mapping(a));

        let (out, _) = apply_ignore(&map, &["a.b".to_string()]);
        assert!(out.is_empty());
    }

    #[test]
    fn absent_path_is_reported_not_raised() {
        let mut map = Mapping::new();
        map.insert("a".into(), ConfigValue::Integer(1));

        let (out, report) = apply_ignore(&map, &["z.y".to_string()]);
        assert_eq!(out, map);
        assert!(report.removed.is_empty());
        assert_eq!(report.unmatched, vec!["z.y".to_string()]);
    }

    #[test]
    fn idempotent_once_applied() {
        let ignore = vec!["a.b".to_string()];
        let (once, _) = apply_ignore(&nested(), &ignore);
        let (twice, report) = apply_ignore(&once, &ignore);
        assert_eq!(once, twice);
        assert_eq!(report.unmatched, ignore);
    }

    #[test]
    fn untouched_entries_keep_relative_order() {
        let mut inner = Mapping::new();
        inner.insert("x".into(), ConfigValue::Integer(1));
        inner.insert("y".into(), ConfigValue::Integer(2));
        let mut map = Mapping::new();
        map.insert("first".into(), ConfigValue::Integer(0));
        map.insert("nested".into(), ConfigValue::Mapping(inner));
        map.insert("last".into(), ConfigValue::Bool(false));

        let (out, _) = apply_ignore(&map, &["nested.x".to_string()]);
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "nested", "last"]);
    }

    #[test]
    fn flatten_then_unflatten_round_trips_leafy_data() {
        let mut creds = Mapping::new();
        creds.insert("user".into(), ConfigValue::String("u".into()));
        let mut db = Mapping::new();
        db.insert("host".into(), ConfigValue::String("h".into()));
        db.insert("credentials".into(), ConfigValue::Mapping(creds));
        let mut map = Mapping::new();
        map.insert("database".into(), ConfigValue::Mapping(db));
        map.insert(
            "tags".into(),
            ConfigValue::Sequence(vec![ConfigValue::Integer(1)]),
        );

        let flat = flatten(&map);
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, ["database.host", "database.credentials.user", "tags"]);
        assert_eq!(unflatten(&flat), map);
    }

    #[test]
    fn sequences_are_leaves_not_expanded() {
        let mut map = Mapping::new();
        map.insert(
            "list".into(),
            ConfigValue::Sequence(vec![ConfigValue::Integer(1), ConfigValue::Integer(2)]),
        );
        let flat = flatten(&map);
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key("list"));
    }
}
