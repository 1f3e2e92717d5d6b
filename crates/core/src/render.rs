//! Result-text rendering
//!
//! Joins formatted resources into the text payload a tool invocation
//! returns: a short human-readable heading followed by the markup blocks, or
//! a literal "no results" sentence for an empty collection.

use crate::markup::format_resource;
use crate::resource::Resource;

/// The sentence for an empty collection. Shared with the table output so
/// the wording cannot drift between the two.
pub fn empty_sentence(label: &str, descriptor: Option<&str>) -> String {
    match descriptor {
        Some(descriptor) => format!("No {label} found {descriptor}."),
        None => format!("No {label} found."),
    }
}

/// The heading for a non-empty collection.
pub fn collection_heading(label: &str, count: usize, descriptor: Option<&str>) -> String {
    match descriptor {
        Some(descriptor) => format!("Found {count} {label} {descriptor}:"),
        None => format!("Found {count} {label}:"),
    }
}

/// Render a collection result.
///
/// `label` is the plural human name ("tests", "test runs"); `kind` is the
/// markup tag for each block. An optional descriptor ("matching tag
/// \"smoke\"") extends the heading.
pub fn render_collection(
    label: &str,
    kind: &str,
    resources: &[Resource],
    field_names: &[&str],
    descriptor: Option<&str>,
) -> String {
    if resources.is_empty() {
        return empty_sentence(label, descriptor);
    }

    let heading = collection_heading(label, resources.len(), descriptor);

    let blocks: Vec<String> = resources
        .iter()
        .map(|resource| format_resource(resource, kind, field_names))
        .collect();

    format!("{heading}\n\n{}", blocks.join("\n"))
}

/// Render a single-resource result with a short heading.
pub fn render_single(
    label: &str,
    kind: &str,
    resource: &Resource,
    field_names: &[&str],
) -> String {
    format!(
        "{} {}:\n\n{}",
        capitalize(label),
        resource.id,
        format_resource(resource, kind, field_names)
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
