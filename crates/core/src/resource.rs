//! Generic API resource and response-envelope parsing
//!
//! Every entity the API returns (test, suite, run, plan, label) has the same
//! wire shape: an `id` plus a bag of named attributes. Collection endpoints
//! wrap their results in `{ "data": [ … ] }`, single-resource endpoints in
//! `{ "data": { … } }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single API resource: an identifier plus a bag of named attributes.
///
/// Attribute keys on the wire use hyphens (`suite-id`); the markup layer
/// accepts either hyphen or underscore spellings when projecting fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, Value>,
}

impl Resource {
    /// Look up an attribute by name, trying the literal spelling first and
    /// then its underscore/hyphen counterpart.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.attributes.get(name) {
            return Some(value);
        }
        let flipped = flip_separator(name);
        if flipped != name {
            return self.attributes.get(&flipped);
        }
        None
    }
}

/// Swap underscores for hyphens or vice versa, preferring the spelling that
/// differs from the input (`suite_id` → `suite-id`, `suite-id` → `suite_id`).
pub fn flip_separator(name: &str) -> String {
    if name.contains('_') {
        name.replace('_', "-")
    } else {
        name.replace('-', "_")
    }
}

/// Parse a collection response.
///
/// Accepts `{ "data": [ … ] }` or a bare array. Entries that do not look
/// like resources (no `id`) are skipped rather than failing the whole
/// response.
pub fn parse_collection(body: &Value) -> Vec<Resource> {
    let items = match body.get("data") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => match body {
            Value::Array(items) => items.as_slice(),
            _ => return Vec::new(),
        },
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

/// Parse a single-resource response.
///
/// Accepts `{ "data": { … } }` or a bare resource object.
pub fn parse_single(body: &Value) -> Option<Resource> {
    let object = match body.get("data") {
        Some(data @ Value::Object(_)) => data,
        _ => body,
    };

    serde_json::from_value(object.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_collection_with_envelope() {
        let body = json!({
            "data": [
                { "id": "t1", "attributes": { "title": "Login works" } },
                { "id": "t2", "attributes": { "title": "Logout works" } }
            ]
        });

        let resources = parse_collection(&body);
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].id, "t1");
        assert_eq!(
            resources[1].attributes.get("title"),
            Some(&json!("Logout works"))
        );
    }

    #[test]
    fn test_parse_collection_bare_array() {
        let body = json!([{ "id": "s1", "attributes": {} }]);
        let resources = parse_collection(&body);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "s1");
    }

    #[test]
    fn test_parse_collection_empty_data() {
        let body = json!({ "data": [] });
        assert!(parse_collection(&body).is_empty());
    }

    #[test]
    fn test_parse_collection_skips_malformed_entries() {
        let body = json!({
            "data": [
                { "id": "ok", "attributes": {} },
                { "attributes": { "title": "missing id" } }
            ]
        });
        let resources = parse_collection(&body);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "ok");
    }

    #[test]
    fn test_parse_single() {
        let body = json!({ "data": { "id": "p1", "attributes": { "title": "Plan" } } });
        let resource = parse_single(&body).unwrap();
        assert_eq!(resource.id, "p1");
    }

    #[test]
    fn test_parse_single_bare_object() {
        let body = json!({ "id": "p2", "attributes": {} });
        assert_eq!(parse_single(&body).unwrap().id, "p2");
    }

    #[test]
    fn test_attribute_lookup_flips_separator() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "t1",
            "attributes": { "suite-id": "s9", "file_name": "a.rs" }
        }))
        .unwrap();

        assert_eq!(resource.attribute("suite_id"), Some(&json!("s9")));
        assert_eq!(resource.attribute("suite-id"), Some(&json!("s9")));
        assert_eq!(resource.attribute("file-name"), Some(&json!("a.rs")));
        assert_eq!(resource.attribute("missing"), None);
    }
}
