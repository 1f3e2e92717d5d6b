//! Query-parameter expansion
//!
//! The API uses Rails-style query conventions: array filters become repeated
//! `name[]` entries, and a nested `filter` object is flattened to
//! `filter[key]=value` pairs. This module turns a JSON map of filters into
//! the flat `(key, value)` pairs handed to the HTTP client.

use serde_json::Value;

/// Expand a filter map into query pairs.
///
/// - scalar → one `key=value` pair (strings unquoted, numbers/bools
///   stringified)
/// - array → one `key[]=value` pair per element, order preserved, duplicates
///   allowed
/// - object → one `key[sub]=value` pair per entry
/// - null → skipped
pub fn build_query_params(filters: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for (key, value) in filters {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        pairs.push((format!("{key}[]"), text));
                    }
                }
            }
            Value::Object(map) => {
                for (sub, sub_value) in map {
                    if let Some(text) = scalar_text(sub_value) {
                        pairs.push((format!("{key}[{sub}]"), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }

    pairs
}

/// Stringify a scalar value; strings stay unquoted.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Vec<(String, String)> {
        let map = value.as_object().cloned().unwrap();
        build_query_params(&map)
    }

    #[test]
    fn test_scalars_become_single_pairs() {
        let pairs = params(json!({ "query": "login", "page": 2, "archived": false }));
        assert!(pairs.contains(&("query".to_string(), "login".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("archived".to_string(), "false".to_string())));
    }

    #[test]
    fn test_arrays_become_repeated_bracket_pairs() {
        let pairs = params(json!({ "labels": ["a", "b"] }));
        assert_eq!(
            pairs,
            vec![
                ("labels[]".to_string(), "a".to_string()),
                ("labels[]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_array_order_and_duplicates_preserved() {
        let pairs = params(json!({ "tags": ["b", "a", "b"] }));
        assert_eq!(
            pairs,
            vec![
                ("tags[]".to_string(), "b".to_string()),
                ("tags[]".to_string(), "a".to_string()),
                ("tags[]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_object_flattened() {
        let pairs = params(json!({ "labels": ["a", "b"], "filter": { "state": "manual" } }));
        assert!(pairs.contains(&("labels[]".to_string(), "a".to_string())));
        assert!(pairs.contains(&("labels[]".to_string(), "b".to_string())));
        assert!(pairs.contains(&("filter[state]".to_string(), "manual".to_string())));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_null_values_skipped() {
        let pairs = params(json!({ "query": null, "page": 1 }));
        assert_eq!(pairs, vec![("page".to_string(), "1".to_string())]);
    }
}
