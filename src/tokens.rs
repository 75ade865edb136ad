//! Token substitution over string leaves, applied before inference.
//!
//! Grammar: `${env:NAME}` or `${env:NAME:default}`, embedded anywhere inside a
//! string value. The lookup source is pluggable; the default resolves from the
//! process environment. An unresolvable token is left in place verbatim and
//! recorded in the report, it never fails the pipeline (see DESIGN.md).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{ConfigValue, Mapping};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{env:([A-Za-z_][A-Za-z0-9_]*)(?::([^}]*))?\}").expect("token grammar regex")
});

/// Where token values come from. External by design: environment, secret
/// store, test fixture.
pub trait TokenSource {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Process environment lookup, the default source.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl TokenSource for EnvSource {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// What one resolution pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenReport {
    pub resolved: usize,
    /// Token names left in place because the source had no value and the
    /// token carried no default.
    pub unresolved: Vec<String>,
}

/// Resolve every token in every string leaf. Key order and non-string values
/// pass through untouched.
pub fn resolve(value: &ConfigValue, source: &dyn TokenSource) -> (ConfigValue, TokenReport) {
    let mut report = TokenReport::default();
    let resolved = walk(value, source, &mut report);
    (resolved, report)
}

/// [`resolve`] against the process environment.
pub fn resolve_env(value: &ConfigValue) -> (ConfigValue, TokenReport) {
    resolve(value, &EnvSource)
}

/// [`resolve`] for a top-level mapping, keeping the mapping type.
pub fn resolve_mapping(map: &Mapping, source: &dyn TokenSource) -> (Mapping, TokenReport) {
    let mut report = TokenReport::default();
    let mut out = Mapping::new();
    for (k, v) in map {
        out.insert(k.clone(), walk(v, source, &mut report));
    }
    (out, report)
}

/// [`resolve_mapping`] against the process environment.
pub fn resolve_mapping_env(map: &Mapping) -> (Mapping, TokenReport) {
    resolve_mapping(map, &EnvSource)
}

fn walk(value: &ConfigValue, source: &dyn TokenSource, report: &mut TokenReport) -> ConfigValue {
    match value {
        ConfigValue::String(s) => ConfigValue::String(substitute(s, source, report)),
        ConfigValue::Sequence(items) => {
            ConfigValue::Sequence(items.iter().map(|v| walk(v, source, report)).collect())
        }
        ConfigValue::Mapping(map) => {
            let mut out = Mapping::new();
            for (k, v) in map {
                out.insert(k.clone(), walk(v, source, report));
            }
            ConfigValue::Mapping(out)
        }
        other => other.clone(),
    }
}

fn substitute(input: &str, source: &dyn TokenSource, report: &mut TokenReport) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in TOKEN_RE.captures_iter(input) {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = &caps[1];
        out.push_str(&input[last..whole.start()]);
        match source.lookup(name).or_else(|| caps.get(2).map(|d| d.as_str().to_string())) {
            Some(replacement) => {
                report.resolved += 1;
                out.push_str(&replacement);
            }
            None => {
                report.unresolved.push(name.to_string());
                out.push_str(whole.as_str());
            }
        }
        last = whole.end();
    }
    out.push_str(&input[last..]);
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    struct MapSource(Vec<(&'static str, &'static str)>);

    impl TokenSource for MapSource {
        fn lookup(&self, name: &str) -> Option<String> {
            self.0
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    fn sample() -> ConfigValue {
        let mut creds = Mapping::new();
        creds.insert("user".into(), ConfigValue::String("${env:DB_USER}".into()));
        creds.insert(
            "password".into(),
            ConfigValue::String("${env:DB_PASSWORD:fallback}".into()),
        );
        let mut map = Mapping::new();
        map.insert("port".into(), ConfigValue::Integer(5432));
        map.insert("credentials".into(), ConfigValue::Mapping(creds));
        ConfigValue::Mapping(map)
    }

    #[test]
    fn tokens_are_substituted_in_place() {
        let source = MapSource(vec![("DB_USER", "admin"), ("DB_PASSWORD", "hunter2")]);
        let (resolved, report) = resolve(&sample(), &source);
        assert_eq!(report.resolved, 2);
        assert!(report.unresolved.is_empty());

        let ConfigValue::Mapping(map) = resolved else {
            panic!("expected mapping");
        };
        let ConfigValue::Mapping(creds) = &map["credentials"] else {
            panic!("expected mapping");
        };
        assert_eq!(creds["user"], ConfigValue::String("admin".into()));
        assert_eq!(creds["password"], ConfigValue::String("hunter2".into()));
    }

    #[test]
    fn missing_token_uses_inline_default() {
        let source = MapSource(vec![]);
        let (resolved, report) = resolve(&sample(), &source);
        assert_eq!(report.resolved, 1);
        assert_eq!(report.unresolved, vec!["DB_USER".to_string()]);

        let ConfigValue::Mapping(map) = resolved else {
            panic!("expected mapping");
        };
        let ConfigValue::Mapping(creds) = &map["credentials"] else {
            panic!("expected mapping");
        };
        // no default: token text stays as-is
        assert_eq!(creds["user"], ConfigValue::String("${env:DB_USER}".into()));
        assert_eq!(creds["password"], ConfigValue::String("fallback".into()));
    }

    #[test]
    fn embedded_tokens_and_surrounding_text() {
        let source = MapSource(vec![("HOST", "db.internal")]);
        let value = ConfigValue::String("postgres://${env:HOST}:5432/app".into());
        let (resolved, report) = resolve(&value, &source);
        assert_eq!(report.resolved, 1);
        assert_eq!(
            resolved,
            ConfigValue::String("postgres://db.internal:5432/app".into())
        );
    }

    #[test]
    fn non_string_leaves_pass_through() {
        let source = MapSource(vec![]);
        let value = ConfigValue::Sequence(vec![
            ConfigValue::Integer(1),
            ConfigValue::Bool(true),
            ConfigValue::Null,
        ]);
        let (resolved, report) = resolve(&value, &source);
        assert_eq!(resolved, value);
        assert_eq!(report, TokenReport::default());
    }

    #[test]
    fn key_order_is_preserved() {
        let source = MapSource(vec![]);
        let mut map = Mapping::new();
        map.insert("z".into(), ConfigValue::Integer(1));
        map.insert("a".into(), ConfigValue::String("${env:X:y}".into()));
        map.insert("m".into(), ConfigValue::Integer(3));
        let (resolved, _) = resolve(&ConfigValue::Mapping(map), &source);
        let ConfigValue::Mapping(out) = resolved else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
