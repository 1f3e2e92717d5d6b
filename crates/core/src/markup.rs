//! Resource → semantic markup rendering
//!
//! Turns a generic `{id, attributes}` resource into an XML-like block that a
//! language model can consume. The caller supplies the tag name for the
//! block (the resource kind) and an ordered field projection; the renderer
//! has no other knowledge of resource kinds.
//!
//! A small, enumerable set of named shapes is consulted before the generic
//! recursive rule: well-known array attributes get semantic child tags
//! (`<tag>`, `<label>`, `<test_id>`) instead of the generic `<item>`, and an
//! embedded test reference is rendered through a fixed sub-projection
//! instead of the key-by-key object rule.

use serde_json::Value;

use crate::resource::Resource;

/// Escape the five XML-significant characters.
///
/// Ampersand is substituted first so entities produced by the other
/// replacements are not double-escaped.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Named special shapes, checked before the generic rendering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A `tags` array: children are `<tag>` elements.
    TagList,
    /// A `labels` array: children are `<label>` elements.
    LabelList,
    /// A `tests-ids` array: children are `<test_id>` elements.
    TestIdList,
    /// An embedded test reference (object carrying both `id` and `title`):
    /// rendered as a fixed id/title/priority/tags sub-projection.
    TestRef,
}

/// Look up the special shape for an attribute, if any.
///
/// Array shapes key off the (underscore-normalized) attribute name; the
/// embedded test reference keys off the value itself.
pub fn detect_shape(field: &str, value: &Value) -> Option<Shape> {
    match value {
        Value::Array(_) => match field.replace('-', "_").as_str() {
            "tags" => Some(Shape::TagList),
            "labels" => Some(Shape::LabelList),
            "tests_ids" => Some(Shape::TestIdList),
            _ => None,
        },
        Value::Object(map) => {
            if map.contains_key("id") && map.contains_key("title") {
                Some(Shape::TestRef)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Render one resource as a markup block.
///
/// The block is opened and closed by `kind`, always starts with an `<id>`
/// element, and then contains one element per projected field, in projection
/// order. Field lookup accepts both hyphen and underscore spellings; the
/// emitted tag always uses the underscore form.
pub fn format_resource(resource: &Resource, kind: &str, field_names: &[&str]) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(kind);
    out.push_str(">\n");

    out.push_str(&format!("  <id>{}</id>\n", escape(&resource.id)));

    for field in field_names {
        let tag = element_tag(field);
        let rendered = match resource.attribute(field) {
            Some(value) => render_value(field, value),
            None => String::new(),
        };
        out.push_str(&format!("  <{tag}>{rendered}</{tag}>\n"));
    }

    out.push_str(&format!("</{kind}>"));
    out
}

/// The emitted element tag for a field: always the underscore form.
fn element_tag(field: &str) -> String {
    field.replace('-', "_")
}

/// Render an attribute value to the element's inner text, recursively.
fn render_value(field: &str, value: &Value) -> String {
    if let Some(shape) = detect_shape(field, value) {
        return render_shape(shape, value);
    }

    match value {
        Value::Null => String::new(),
        Value::String(s) => escape(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => render_items("item", items),
        Value::Object(map) => render_object(map),
    }
}

/// Render one of the named special shapes.
fn render_shape(shape: Shape, value: &Value) -> String {
    match shape {
        Shape::TagList => render_array_shape("tag", value),
        Shape::LabelList => render_array_shape("label", value),
        Shape::TestIdList => render_array_shape("test_id", value),
        Shape::TestRef => render_test_ref(value),
    }
}

fn render_array_shape(child_tag: &str, value: &Value) -> String {
    match value {
        Value::Array(items) => render_items(child_tag, items),
        _ => String::new(),
    }
}

fn render_items(child_tag: &str, items: &[Value]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "<{child_tag}>{}</{child_tag}>",
            render_value(child_tag, item)
        ));
    }
    out
}

/// Generic nested object: every key becomes its own child element, no
/// projection filtering at this level.
fn render_object(map: &serde_json::Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        let tag = element_tag(key);
        out.push_str(&format!("<{tag}>{}</{tag}>", render_value(key, value)));
    }
    out
}

/// Embedded test reference: fixed id/title/priority/tags sub-projection,
/// with priority defaulting to "normal" when absent.
fn render_test_ref(value: &Value) -> String {
    let id = value.get("id").map(|v| render_value("id", v)).unwrap_or_default();
    let title = value
        .get("title")
        .map(|v| render_value("title", v))
        .unwrap_or_default();
    let priority = match value.get("priority") {
        Some(Value::Null) | None => "normal".to_string(),
        Some(v) => render_value("priority", v),
    };
    let tags = value
        .get("tags")
        .map(|v| render_value("tags", v))
        .unwrap_or_default();

    format!(
        "<id>{id}</id><title>{title}</title><priority>{priority}</priority><tags>{tags}</tags>"
    )
}
