//! Test operations: search, get, create, update

use clap::Args;
use colored::Colorize;
use reqwest::Method;
use serde_json::{json, Value};

use testmat_core::fields::TEST_FIELDS;
use testmat_core::params::build_query_params;
use testmat_core::render::{collection_heading, empty_sentence, render_collection, render_single};
use testmat_core::resource::{parse_collection, parse_single, Resource};
use testmat_core::tags::{classify_query, extract_tags_from_title, merge_tags, QueryKind};

use crate::client::ApiClient;
use crate::error::Error;
use crate::prelude::{println, *};

/// Test module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "tests")]
#[command(about = "Test operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Search tests by free text, @tag, or issue key
    #[clap(name = "search")]
    Search(SearchOptions),

    /// Get a single test by id
    #[clap(name = "get")]
    Get(GetOptions),

    /// Create a new test
    #[clap(name = "create")]
    Create(CreateOptions),

    /// Update an existing test
    #[clap(name = "update")]
    Update(UpdateOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Search(options) => search_handler(options, &global).await,
        Commands::Get(options) => get_handler(options, &global).await,
        Commands::Create(options) => create_handler(options, &global).await,
        Commands::Update(options) => update_handler(options, &global).await,
    }
}

/// Options for searching tests
#[derive(Debug, Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Free-text search:
  testmat tests search \"login flow\"

  # Tag search (queries starting with @ are tag searches):
  testmat tests search @smoke

  # Filter by state and repeated labels:
  testmat tests search --state manual --label ui --label api")]
pub struct SearchOptions {
    /// Free-text query; `@tag` searches by tag, `ABC-123` references an issue
    pub query: Option<String>,

    /// Restrict to a suite id
    #[arg(long)]
    pub suite: Option<String>,

    /// Restrict to a plan id
    #[arg(long)]
    pub plan: Option<String>,

    /// Filter by state (e.g., manual, automated)
    #[arg(long)]
    pub state: Option<String>,

    /// Filter by priority (e.g., high, normal, low)
    #[arg(long)]
    pub priority: Option<String>,

    /// Filter by label, repeatable
    #[arg(long = "label")]
    pub labels: Vec<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Build the filter map for a test search; arrays become `name[]` entries
/// and state/priority travel inside the nested `filter` object.
fn search_filters(options: &SearchOptions) -> serde_json::Map<String, Value> {
    let mut filters = serde_json::Map::new();

    if let Some(query) = &options.query {
        filters.insert("query".to_string(), json!(query));
    }
    if let Some(suite) = &options.suite {
        filters.insert("suite_id".to_string(), json!(suite));
    }
    if let Some(plan) = &options.plan {
        filters.insert("plan_id".to_string(), json!(plan));
    }
    if !options.labels.is_empty() {
        filters.insert("labels".to_string(), json!(options.labels));
    }
    if let Some(page) = options.page {
        filters.insert("page".to_string(), json!(page));
    }

    let mut filter = serde_json::Map::new();
    if let Some(state) = &options.state {
        filter.insert("state".to_string(), json!(state));
    }
    if let Some(priority) = &options.priority {
        filter.insert("priority".to_string(), json!(priority));
    }
    if !filter.is_empty() {
        filters.insert("filter".to_string(), Value::Object(filter));
    }

    filters
}

/// Describe the query for the result heading. Classification never changes
/// what is sent to the API, only how the heading reads.
fn search_descriptor(query: Option<&str>) -> Option<String> {
    query.map(|query| match classify_query(query) {
        QueryKind::Tag(tag) => format!("matching tag \"{tag}\""),
        QueryKind::IssueReference => format!("referencing issue {query}"),
        QueryKind::Text => format!("matching \"{query}\""),
    })
}

/// Fetch the tests matching the search options.
pub async fn search_tests_resources(
    client: &ApiClient,
    options: &SearchOptions,
) -> Result<Vec<Resource>, Error> {
    let params = build_query_params(&search_filters(options));
    let body = client.execute(Method::GET, "/tests", &params, None).await?;
    Ok(parse_collection(&body))
}

/// Public data function - used by both CLI and MCP
pub async fn search_tests_data(
    client: &ApiClient,
    options: &SearchOptions,
) -> Result<String, Error> {
    let resources = search_tests_resources(client, options).await?;
    Ok(render_collection(
        "tests",
        "test",
        &resources,
        TEST_FIELDS,
        search_descriptor(options.query.as_deref()).as_deref(),
    ))
}

async fn search_handler(options: SearchOptions, global: &crate::Global) -> Result<()> {
    let client = super::create_client(global)?;
    let resources = search_tests_resources(&client, &options).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&resources)?);
        return Ok(());
    }

    let descriptor = search_descriptor(options.query.as_deref());
    if resources.is_empty() {
        println!("{}", empty_sentence("tests", descriptor.as_deref()));
        return Ok(());
    }

    println!(
        "{}\n",
        collection_heading("tests", resources.len(), descriptor.as_deref())
    );

    let mut table = new_table();
    table.add_row(prettytable::row!["Id", "Title", "State", "Priority"]);
    for resource in &resources {
        table.add_row(prettytable::row![
            resource.id.bold().cyan().to_string(),
            attribute_text(resource, "title"),
            attribute_text(resource, "state").green().to_string(),
            attribute_text(resource, "priority").bright_yellow().to_string()
        ]);
    }
    table.printstd();

    Ok(())
}

fn attribute_text(resource: &Resource, name: &str) -> String {
    resource
        .attribute(name)
        .and_then(|value| value.as_str())
        .unwrap_or("")
        .to_string()
}

/// Options for getting a single test
#[derive(Debug, Args, Clone)]
pub struct GetOptions {
    /// Test id
    pub id: String,
}

/// Public data function - used by both CLI and MCP
pub async fn get_test_data(client: &ApiClient, id: &str) -> Result<String, Error> {
    let path = format!("/tests/{id}");
    let body = client.execute(Method::GET, &path, &[], None).await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network(format!("Unexpected response shape from {path}")))?;
    Ok(render_single("test", "test", &resource, TEST_FIELDS))
}

async fn get_handler(options: GetOptions, global: &crate::Global) -> Result<()> {
    let client = super::create_client(global)?;
    let text = get_test_data(&client, &options.id).await?;
    println!("{text}");
    Ok(())
}

/// Options for creating a test
#[derive(Debug, Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Title @tokens become tags, merged with explicit --tag values:
  testmat tests create \"@smoke login works\" --tag regression --suite S1")]
pub struct CreateOptions {
    /// Test title; `@word` tokens are extracted as tags
    pub title: String,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Suite id to create the test in
    #[arg(long)]
    pub suite: Option<String>,

    /// Priority (e.g., high, normal, low)
    #[arg(long)]
    pub priority: Option<String>,

    /// State (e.g., manual, automated)
    #[arg(long)]
    pub state: Option<String>,

    /// Explicit tag, repeatable; a leading @ is stripped
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Label id to attach, repeatable
    #[arg(long = "label")]
    pub labels: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Build the JSON:API-shaped create payload.
fn create_payload(options: &CreateOptions) -> Value {
    let extracted = extract_tags_from_title(&options.title);
    let tags = merge_tags(&options.tags, &extracted);

    let mut attributes = serde_json::Map::new();
    attributes.insert("title".to_string(), json!(options.title));
    if let Some(description) = &options.description {
        attributes.insert("description".to_string(), json!(description));
    }
    if let Some(suite) = &options.suite {
        attributes.insert("suite-id".to_string(), json!(suite));
    }
    if let Some(priority) = &options.priority {
        attributes.insert("priority".to_string(), json!(priority));
    }
    if let Some(state) = &options.state {
        attributes.insert("state".to_string(), json!(state));
    }
    if !tags.is_empty() {
        attributes.insert("tags".to_string(), json!(tags));
    }

    let mut payload = json!({
        "data": {
            "type": "tests",
            "attributes": attributes,
        }
    });
    if !options.labels.is_empty() {
        payload["labels_ids"] = json!(options.labels);
    }
    payload
}

/// Public data function - used by both CLI and MCP
pub async fn create_test_data(
    client: &ApiClient,
    options: &CreateOptions,
) -> Result<String, Error> {
    let payload = create_payload(options);
    let body = client
        .execute(Method::POST, "/tests", &[], Some(&payload))
        .await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network("Unexpected response shape from /tests".to_string()))?;
    Ok(format!(
        "Created test {}.\n\n{}",
        resource.id,
        testmat_core::markup::format_resource(&resource, "test", TEST_FIELDS)
    ))
}

async fn create_handler(options: CreateOptions, global: &crate::Global) -> Result<()> {
    let client = super::create_client(global)?;
    let text = create_test_data(&client, &options).await?;
    println!("{text}");
    Ok(())
}

/// Options for updating a test
#[derive(Debug, Args, Clone)]
pub struct UpdateOptions {
    /// Test id
    pub id: String,

    /// New title; `@word` tokens are extracted as tags
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New priority
    #[arg(long)]
    pub priority: Option<String>,

    /// New state
    #[arg(long)]
    pub state: Option<String>,

    /// Explicit tag, repeatable; a leading @ is stripped
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Label id to attach, repeatable
    #[arg(long = "label")]
    pub labels: Vec<String>,
}

/// Build the update payload; only supplied fields are sent.
fn update_payload(options: &UpdateOptions) -> Value {
    let mut attributes = serde_json::Map::new();
    if let Some(title) = &options.title {
        attributes.insert("title".to_string(), json!(title));
    }
    if let Some(description) = &options.description {
        attributes.insert("description".to_string(), json!(description));
    }
    if let Some(priority) = &options.priority {
        attributes.insert("priority".to_string(), json!(priority));
    }
    if let Some(state) = &options.state {
        attributes.insert("state".to_string(), json!(state));
    }

    let extracted = options
        .title
        .as_deref()
        .map(extract_tags_from_title)
        .unwrap_or_default();
    let tags = merge_tags(&options.tags, &extracted);
    if !tags.is_empty() {
        attributes.insert("tags".to_string(), json!(tags));
    }

    let mut payload = json!({
        "data": {
            "type": "tests",
            "attributes": attributes,
        }
    });
    if !options.labels.is_empty() {
        payload["labels_ids"] = json!(options.labels);
    }
    payload
}

/// Public data function - used by both CLI and MCP
pub async fn update_test_data(
    client: &ApiClient,
    options: &UpdateOptions,
) -> Result<String, Error> {
    let path = format!("/tests/{}", options.id);
    let payload = update_payload(options);
    let body = client
        .execute(Method::PUT, &path, &[], Some(&payload))
        .await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network(format!("Unexpected response shape from {path}")))?;
    Ok(format!(
        "Updated test {}.\n\n{}",
        resource.id,
        testmat_core::markup::format_resource(&resource, "test", TEST_FIELDS)
    ))
}

async fn update_handler(options: UpdateOptions, global: &crate::Global) -> Result<()> {
    let client = super::create_client(global)?;
    let text = update_test_data(&client, &options).await?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_options() -> SearchOptions {
        SearchOptions {
            query: None,
            suite: None,
            plan: None,
            state: None,
            priority: None,
            labels: Vec::new(),
            page: None,
            json: false,
        }
    }

    #[test]
    fn test_search_filters_labels_and_state() {
        let mut options = search_options();
        options.labels = vec!["a".to_string(), "b".to_string()];
        options.state = Some("manual".to_string());

        let pairs = build_query_params(&search_filters(&options));
        assert!(pairs.contains(&("labels[]".to_string(), "a".to_string())));
        assert!(pairs.contains(&("labels[]".to_string(), "b".to_string())));
        assert!(pairs.contains(&("filter[state]".to_string(), "manual".to_string())));
    }

    #[test]
    fn test_search_descriptor_classifies_but_does_not_route() {
        let mut options = search_options();
        options.query = Some("@smoke".to_string());

        // The descriptor reads as a tag search...
        assert_eq!(
            search_descriptor(options.query.as_deref()).unwrap(),
            "matching tag \"smoke\""
        );
        // ...but the query parameter is sent unchanged.
        let pairs = build_query_params(&search_filters(&options));
        assert!(pairs.contains(&("query".to_string(), "@smoke".to_string())));
    }

    #[test]
    fn test_search_descriptor_issue_reference() {
        assert_eq!(
            search_descriptor(Some("PROJ-42")).unwrap(),
            "referencing issue PROJ-42"
        );
    }

    #[test]
    fn test_create_payload_merges_title_tags() {
        let options = CreateOptions {
            title: "@smoke login works".to_string(),
            description: None,
            suite: Some("S1".to_string()),
            priority: None,
            state: None,
            tags: vec!["@regression".to_string()],
            labels: vec!["l1".to_string()],
            json: false,
        };

        let payload = create_payload(&options);
        assert_eq!(payload["data"]["type"], "tests");
        assert_eq!(payload["data"]["attributes"]["suite-id"], "S1");
        assert_eq!(
            payload["data"]["attributes"]["tags"],
            serde_json::json!(["regression", "smoke"])
        );
        assert_eq!(payload["labels_ids"], serde_json::json!(["l1"]));
    }

    #[test]
    fn test_update_payload_only_sends_supplied_fields() {
        let options = UpdateOptions {
            id: "t1".to_string(),
            title: None,
            description: None,
            priority: Some("high".to_string()),
            state: None,
            tags: Vec::new(),
            labels: Vec::new(),
        };

        let payload = update_payload(&options);
        let attributes = payload["data"]["attributes"].as_object().unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes["priority"], "high");
    }
}
