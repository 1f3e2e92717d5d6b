//! Suite operations: search, get, create, update

use clap::Args;
use reqwest::Method;
use serde_json::{json, Value};

use testmat_core::fields::SUITE_FIELDS;
use testmat_core::params::build_query_params;
use testmat_core::render::{render_collection, render_single};
use testmat_core::resource::{parse_collection, parse_single};

use crate::client::ApiClient;
use crate::error::Error;
use crate::prelude::{println, *};

/// Suite module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "suites")]
#[command(about = "Suite operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Search suites by free text
    #[clap(name = "search")]
    Search(SearchOptions),

    /// Get a single suite by id
    #[clap(name = "get")]
    Get(GetOptions),

    /// Create a new suite
    #[clap(name = "create")]
    Create(CreateOptions),

    /// Update an existing suite
    #[clap(name = "update")]
    Update(UpdateOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let client = super::create_client(&global)?;

    let text = match app.command {
        Commands::Search(options) => search_suites_data(&client, &options).await?,
        Commands::Get(options) => get_suite_data(&client, &options.id).await?,
        Commands::Create(options) => create_suite_data(&client, &options).await?,
        Commands::Update(options) => update_suite_data(&client, &options).await?,
    };

    println!("{text}");
    Ok(())
}

/// Options for searching suites
#[derive(Debug, Args, Clone)]
pub struct SearchOptions {
    /// Free-text query
    pub query: Option<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<u64>,
}

/// Public data function - used by both CLI and MCP
pub async fn search_suites_data(
    client: &ApiClient,
    options: &SearchOptions,
) -> Result<String, Error> {
    let mut filters = serde_json::Map::new();
    if let Some(query) = &options.query {
        filters.insert("query".to_string(), json!(query));
    }
    if let Some(page) = options.page {
        filters.insert("page".to_string(), json!(page));
    }

    let params = build_query_params(&filters);
    let body = client.execute(Method::GET, "/suites", &params, None).await?;
    let resources = parse_collection(&body);

    let descriptor = options.query.as_ref().map(|query| format!("matching \"{query}\""));
    Ok(render_collection(
        "suites",
        "suite",
        &resources,
        SUITE_FIELDS,
        descriptor.as_deref(),
    ))
}

/// Options for getting a single suite
#[derive(Debug, Args, Clone)]
pub struct GetOptions {
    /// Suite id
    pub id: String,
}

/// Public data function - used by both CLI and MCP
pub async fn get_suite_data(client: &ApiClient, id: &str) -> Result<String, Error> {
    let path = format!("/suites/{id}");
    let body = client.execute(Method::GET, &path, &[], None).await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network(format!("Unexpected response shape from {path}")))?;
    Ok(render_single("suite", "suite", &resource, SUITE_FIELDS))
}

/// Options for creating a suite
#[derive(Debug, Args, Clone)]
pub struct CreateOptions {
    /// Suite title
    pub title: String,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Parent suite id
    #[arg(long)]
    pub parent: Option<String>,

    /// File type (file or folder)
    #[arg(long)]
    pub file_type: Option<String>,
}

fn create_payload(options: &CreateOptions) -> Value {
    let mut attributes = serde_json::Map::new();
    attributes.insert("title".to_string(), json!(options.title));
    if let Some(description) = &options.description {
        attributes.insert("description".to_string(), json!(description));
    }
    if let Some(parent) = &options.parent {
        attributes.insert("parent-id".to_string(), json!(parent));
    }
    if let Some(file_type) = &options.file_type {
        attributes.insert("file-type".to_string(), json!(file_type));
    }

    json!({
        "data": {
            "type": "suites",
            "attributes": attributes,
        }
    })
}

/// Public data function - used by both CLI and MCP
pub async fn create_suite_data(
    client: &ApiClient,
    options: &CreateOptions,
) -> Result<String, Error> {
    let payload = create_payload(options);
    let body = client
        .execute(Method::POST, "/suites", &[], Some(&payload))
        .await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network("Unexpected response shape from /suites".to_string()))?;
    Ok(format!(
        "Created suite {}.\n\n{}",
        resource.id,
        testmat_core::markup::format_resource(&resource, "suite", SUITE_FIELDS)
    ))
}

/// Options for updating a suite
#[derive(Debug, Args, Clone)]
pub struct UpdateOptions {
    /// Suite id
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New parent suite id
    #[arg(long)]
    pub parent: Option<String>,
}

/// Public data function - used by both CLI and MCP
pub async fn update_suite_data(
    client: &ApiClient,
    options: &UpdateOptions,
) -> Result<String, Error> {
    let mut attributes = serde_json::Map::new();
    if let Some(title) = &options.title {
        attributes.insert("title".to_string(), json!(title));
    }
    if let Some(description) = &options.description {
        attributes.insert("description".to_string(), json!(description));
    }
    if let Some(parent) = &options.parent {
        attributes.insert("parent-id".to_string(), json!(parent));
    }

    let payload = json!({
        "data": {
            "type": "suites",
            "attributes": attributes,
        }
    });

    let path = format!("/suites/{}", options.id);
    let body = client
        .execute(Method::PUT, &path, &[], Some(&payload))
        .await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network(format!("Unexpected response shape from {path}")))?;
    Ok(format!(
        "Updated suite {}.\n\n{}",
        resource.id,
        testmat_core::markup::format_resource(&resource, "suite", SUITE_FIELDS)
    ))
}
