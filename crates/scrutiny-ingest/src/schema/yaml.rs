//! Helpers over raw `serde_yaml` values.

use serde_yaml::{Mapping, Value as Yaml};
use std::collections::BTreeMap;

use scrutiny_core::Value;

/// Overlays `over` onto `base`.
///
/// Nested mappings merge key by key; an explicit `null` clears the base
/// entry; anything else replaces it. A missing or null override keeps `base`.
pub fn deep_merge(base: &Yaml, over: &Yaml) -> Yaml {
    let over = match over {
        Yaml::Mapping(m) => m,
        _ => return base.clone(),
    };
    let mut out = match base {
        Yaml::Mapping(m) => m.clone(),
        _ => Mapping::new(),
    };
    for (k, v) in over {
        let merged = match (out.get(k), v) {
            (_, Yaml::Null) => Yaml::Null,
            (Some(existing @ Yaml::Mapping(_)), Yaml::Mapping(_)) => deep_merge(existing, v),
            _ => v.clone(),
        };
        out.insert(k.clone(), merged);
    }
    Yaml::Mapping(out)
}

/// Looks up `key` in a mapping; anything else yields `None`.
pub fn get<'a>(value: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    value.as_mapping().and_then(|m| m.get(key))
}

/// Like [`get`] but null reads as absent.
pub fn get_present<'a>(value: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    get(value, key).filter(|v| !v.is_null())
}

/// Text of a scalar; `None` for null and containers.
pub fn scalar_text(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Tagged(t) => scalar_text(&t.value),
        _ => None,
    }
}

/// Converts into the comparison value model. Non-string mapping keys are
/// stringified; tags are dropped.
pub fn to_value(value: &Yaml) -> Value {
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::bool(*b),
        Yaml::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::int(i),
            (None, Some(f)) => Value::float(f),
            (None, None) => Value::str(n.to_string()),
        },
        Yaml::String(s) => Value::str(s.clone()),
        Yaml::Sequence(items) => Value::Sequence(items.iter().map(to_value).collect()),
        Yaml::Mapping(map) => Value::Mapping(to_map(map)),
        Yaml::Tagged(t) => to_value(&t.value),
    }
}

pub fn to_map(map: &Mapping) -> BTreeMap<String, Value> {
    map.iter()
        .filter_map(|(k, v)| scalar_text(k).map(|k| (k, to_value(v))))
        .collect()
}

/// Truthiness of a flag-like value; null and absent are `false`.
pub fn truthy(value: Option<&Yaml>) -> bool {
    match value {
        None | Some(Yaml::Null) => false,
        Some(Yaml::Bool(b)) => *b,
        Some(Yaml::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Yaml::String(s)) => !s.is_empty(),
        Some(Yaml::Sequence(s)) => !s.is_empty(),
        Some(Yaml::Mapping(m)) => !m.is_empty(),
        Some(Yaml::Tagged(t)) => truthy(Some(&t.value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Yaml {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_deep_merge_nested_and_null_clears() {
        let base = yaml("component: {comparator: basic, threshold_ratio: 0.2}\ntarget: {a: 1}");
        let over = yaml("component: {threshold_ratio: null, match_key: name}");
        let merged = deep_merge(&base, &over);

        let component = get(&merged, "component").unwrap();
        assert_eq!(get(component, "comparator"), Some(&yaml("basic")));
        assert_eq!(get(component, "match_key"), Some(&yaml("name")));
        assert_eq!(get(component, "threshold_ratio"), Some(&Yaml::Null));
        assert!(get_present(component, "threshold_ratio").is_none());
        assert_eq!(get(&merged, "target"), get(&base, "target"));
    }

    #[test]
    fn test_deep_merge_missing_override_keeps_base() {
        let base = yaml("a: 1");
        assert_eq!(deep_merge(&base, &Yaml::Null), base);
        assert_eq!(deep_merge(&Yaml::Null, &base), base);
    }

    #[test]
    fn test_scalar_text_and_conversion() {
        assert_eq!(scalar_text(&yaml("0.12")).as_deref(), Some("0.12"));
        assert_eq!(scalar_text(&yaml("\"0.11\"")).as_deref(), Some("0.11"));
        assert_eq!(scalar_text(&Yaml::Null), None);

        let value = to_value(&yaml("{n: 3, f: 0.5, s: x, l: [true, ~], 7: seven}"));
        let map = match value {
            Value::Mapping(m) => m,
            other => panic!("expected mapping, got {other:?}"),
        };
        assert_eq!(map["n"], Value::int(3));
        assert_eq!(map["f"], Value::float(0.5));
        assert_eq!(map["s"], Value::str("x"));
        assert_eq!(map["l"], Value::Sequence(vec![Value::bool(true), Value::Null]));
        assert_eq!(map["7"], Value::str("seven"));
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(Some(&yaml("true"))));
        assert!(truthy(Some(&yaml("1"))));
        assert!(!truthy(Some(&yaml("0"))));
        assert!(!truthy(Some(&Yaml::Null)));
        assert!(!truthy(None));
    }
}
