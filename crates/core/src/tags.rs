//! Tag extraction and search-query classification
//!
//! Titles may carry implicit tags as `@word` tokens ("@smoke login works").
//! Tool operations merge those with explicitly supplied tags before sending
//! a create/update payload, and classify free-text search queries for the
//! human-readable result heading.

use regex::Regex;

/// Extract `@word` tokens from a title as implicit tags.
///
/// Tokens may include hyphens and underscores, matching is case-sensitive,
/// and duplicates are dropped keeping first-seen order. The `@` prefix is
/// stripped from the returned values.
pub fn extract_tags_from_title(title: &str) -> Vec<String> {
    let re = Regex::new(r"@([A-Za-z0-9_-]+)").unwrap();

    let mut tags: Vec<String> = Vec::new();
    for capture in re.captures_iter(title) {
        let tag = capture[1].to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Merge explicit tags with tags extracted from a title.
///
/// Explicit tags keep their order and lose any leading `@`; extracted tags
/// not already present are appended after them.
pub fn merge_tags(explicit: &[String], extracted: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();

    for tag in explicit {
        let cleaned = tag.strip_prefix('@').unwrap_or(tag).to_string();
        if !merged.contains(&cleaned) {
            merged.push(cleaned);
        }
    }

    for tag in extracted {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }

    merged
}

/// What a free-text search query looks like.
///
/// The classification only affects how the result heading describes the
/// search; the query is sent to the API unchanged either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Starts with `@`: a tag search.
    Tag(String),
    /// Matches an issue-tracker key (uppercase letters, hyphen, digits).
    IssueReference,
    /// Anything else.
    Text,
}

/// Classify a free-text search query.
pub fn classify_query(query: &str) -> QueryKind {
    if let Some(tag) = query.strip_prefix('@') {
        return QueryKind::Tag(tag.to_string());
    }

    let issue_key = Regex::new(r"^[A-Z]+-\d+$").unwrap();
    if issue_key.is_match(query) {
        return QueryKind::IssueReference;
    }

    QueryKind::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tags_in_order() {
        let tags = extract_tags_from_title("@smoke @regression test with @critical priority");
        assert_eq!(tags, vec!["smoke", "regression", "critical"]);
    }

    #[test]
    fn test_extract_tags_dedups_first_seen() {
        let tags = extract_tags_from_title("@smoke run @fast then @smoke again");
        assert_eq!(tags, vec!["smoke", "fast"]);
    }

    #[test]
    fn test_extract_tags_allows_hyphens_and_underscores() {
        let tags = extract_tags_from_title("@front-end and @back_end checks");
        assert_eq!(tags, vec!["front-end", "back_end"]);
    }

    #[test]
    fn test_extract_tags_is_case_sensitive() {
        let tags = extract_tags_from_title("@Smoke and @smoke");
        assert_eq!(tags, vec!["Smoke", "smoke"]);
    }

    #[test]
    fn test_extract_tags_empty_when_none() {
        assert!(extract_tags_from_title("plain title").is_empty());
    }

    #[test]
    fn test_merge_strips_at_and_preserves_order() {
        let explicit = vec![
            "@frontend".to_string(),
            "backend".to_string(),
            "@ui".to_string(),
        ];
        let extracted = vec!["api".to_string()];
        assert_eq!(
            merge_tags(&explicit, &extracted),
            vec!["frontend", "backend", "ui", "api"]
        );
    }

    #[test]
    fn test_merge_skips_already_present_extracted() {
        let explicit = vec!["smoke".to_string()];
        let extracted = vec!["smoke".to_string(), "fast".to_string()];
        assert_eq!(merge_tags(&explicit, &extracted), vec!["smoke", "fast"]);
    }

    #[test]
    fn test_classify_tag_query() {
        assert_eq!(
            classify_query("@smoke"),
            QueryKind::Tag("smoke".to_string())
        );
    }

    #[test]
    fn test_classify_issue_reference() {
        assert_eq!(classify_query("PROJ-123"), QueryKind::IssueReference);
        assert_eq!(classify_query("ABC-1"), QueryKind::IssueReference);
    }

    #[test]
    fn test_classify_plain_text() {
        assert_eq!(classify_query("login flow"), QueryKind::Text);
        assert_eq!(classify_query("proj-123"), QueryKind::Text);
        assert_eq!(classify_query("PROJ-123x"), QueryKind::Text);
    }
}
