//! Test run operations: list, get, create
//!
//! Runs are read from `/runs`; creation goes through the separate
//! `/testruns` endpoint the API exposes for reporter clients.

use clap::Args;
use reqwest::Method;
use serde_json::{json, Value};

use testmat_core::fields::RUN_FIELDS;
use testmat_core::params::build_query_params;
use testmat_core::render::{render_collection, render_single};
use testmat_core::resource::{parse_collection, parse_single};

use crate::client::ApiClient;
use crate::error::Error;
use crate::prelude::{println, *};

/// Run module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "runs")]
#[command(about = "Test run operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List test runs
    #[clap(name = "list")]
    List(ListOptions),

    /// Get a single run by id
    #[clap(name = "get")]
    Get(GetOptions),

    /// Create a new run
    #[clap(name = "create")]
    Create(CreateOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let client = super::create_client(&global)?;

    let text = match app.command {
        Commands::List(options) => list_runs_data(&client, &options).await?,
        Commands::Get(options) => get_run_data(&client, &options.id).await?,
        Commands::Create(options) => create_run_data(&client, &options).await?,
    };

    println!("{text}");
    Ok(())
}

/// Options for listing runs
#[derive(Debug, Args, Clone)]
pub struct ListOptions {
    /// Filter by status (e.g., passed, failed, running)
    #[arg(long)]
    pub status: Option<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<u64>,
}

/// Public data function - used by both CLI and MCP
pub async fn list_runs_data(client: &ApiClient, options: &ListOptions) -> Result<String, Error> {
    let mut filters = serde_json::Map::new();
    if let Some(status) = &options.status {
        filters.insert("filter".to_string(), json!({ "status": status }));
    }
    if let Some(page) = options.page {
        filters.insert("page".to_string(), json!(page));
    }

    let params = build_query_params(&filters);
    let body = client.execute(Method::GET, "/runs", &params, None).await?;
    let resources = parse_collection(&body);

    Ok(render_collection("test runs", "run", &resources, RUN_FIELDS, None))
}

/// Options for getting a single run
#[derive(Debug, Args, Clone)]
pub struct GetOptions {
    /// Run id
    pub id: String,
}

/// Public data function - used by both CLI and MCP
pub async fn get_run_data(client: &ApiClient, id: &str) -> Result<String, Error> {
    let path = format!("/runs/{id}");
    let body = client.execute(Method::GET, &path, &[], None).await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network(format!("Unexpected response shape from {path}")))?;
    Ok(render_single("run", "run", &resource, RUN_FIELDS))
}

/// Options for creating a run
#[derive(Debug, Args, Clone)]
pub struct CreateOptions {
    /// Run title
    pub title: String,

    /// Environment label (e.g., staging, chrome)
    #[arg(long)]
    pub env: Option<String>,

    /// Plan id to run
    #[arg(long)]
    pub plan: Option<String>,

    /// Tag to run, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

fn create_payload(options: &CreateOptions) -> Value {
    let mut attributes = serde_json::Map::new();
    attributes.insert("title".to_string(), json!(options.title));
    if let Some(env) = &options.env {
        attributes.insert("env".to_string(), json!(env));
    }
    if !options.tags.is_empty() {
        attributes.insert("tags".to_string(), json!(options.tags));
    }

    let mut data = serde_json::Map::new();
    data.insert("type".to_string(), json!("runs"));
    data.insert("attributes".to_string(), Value::Object(attributes));
    if let Some(plan) = &options.plan {
        data.insert(
            "relationships".to_string(),
            json!({ "plan": { "data": { "type": "plans", "id": plan } } }),
        );
    }

    json!({ "data": data })
}

/// Public data function - used by both CLI and MCP
pub async fn create_run_data(client: &ApiClient, options: &CreateOptions) -> Result<String, Error> {
    let payload = create_payload(options);
    let body = client
        .execute(Method::POST, "/testruns", &[], Some(&payload))
        .await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network("Unexpected response shape from /testruns".to_string()))?;
    Ok(format!(
        "Created run {}.\n\n{}",
        resource.id,
        testmat_core::markup::format_resource(&resource, "run", RUN_FIELDS)
    ))
}
