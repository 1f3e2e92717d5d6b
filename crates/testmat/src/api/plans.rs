//! Plan operations: list, get, create

use clap::Args;
use reqwest::Method;
use serde_json::{json, Value};

use testmat_core::fields::PLAN_FIELDS;
use testmat_core::params::build_query_params;
use testmat_core::render::{render_collection, render_single};
use testmat_core::resource::{parse_collection, parse_single};

use crate::client::ApiClient;
use crate::error::Error;
use crate::prelude::{println, *};

/// Plan module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "plans")]
#[command(about = "Plan operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List plans
    #[clap(name = "list")]
    List(ListOptions),

    /// Get a single plan by id
    #[clap(name = "get")]
    Get(GetOptions),

    /// Create a new plan
    #[clap(name = "create")]
    Create(CreateOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let client = super::create_client(&global)?;

    let text = match app.command {
        Commands::List(options) => list_plans_data(&client, &options).await?,
        Commands::Get(options) => get_plan_data(&client, &options.id).await?,
        Commands::Create(options) => create_plan_data(&client, &options).await?,
    };

    println!("{text}");
    Ok(())
}

/// Options for listing plans
#[derive(Debug, Args, Clone)]
pub struct ListOptions {
    /// Filter by kind (e.g., manual, automated, mixed)
    #[arg(long)]
    pub kind: Option<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<u64>,
}

/// Public data function - used by both CLI and MCP
pub async fn list_plans_data(client: &ApiClient, options: &ListOptions) -> Result<String, Error> {
    let mut filters = serde_json::Map::new();
    if let Some(kind) = &options.kind {
        filters.insert("filter".to_string(), json!({ "kind": kind }));
    }
    if let Some(page) = options.page {
        filters.insert("page".to_string(), json!(page));
    }

    let params = build_query_params(&filters);
    let body = client.execute(Method::GET, "/plans", &params, None).await?;
    let resources = parse_collection(&body);

    Ok(render_collection("plans", "plan", &resources, PLAN_FIELDS, None))
}

/// Options for getting a single plan
#[derive(Debug, Args, Clone)]
pub struct GetOptions {
    /// Plan id
    pub id: String,
}

/// Public data function - used by both CLI and MCP
pub async fn get_plan_data(client: &ApiClient, id: &str) -> Result<String, Error> {
    let path = format!("/plans/{id}");
    let body = client.execute(Method::GET, &path, &[], None).await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network(format!("Unexpected response shape from {path}")))?;
    Ok(render_single("plan", "plan", &resource, PLAN_FIELDS))
}

/// Options for creating a plan
#[derive(Debug, Args, Clone)]
pub struct CreateOptions {
    /// Plan title
    pub title: String,

    /// Plan kind (e.g., manual, automated, mixed)
    #[arg(long)]
    pub kind: Option<String>,

    /// Test id to include, repeatable
    #[arg(long = "test")]
    pub tests: Vec<String>,
}

fn create_payload(options: &CreateOptions) -> Value {
    let mut attributes = serde_json::Map::new();
    attributes.insert("title".to_string(), json!(options.title));
    if let Some(kind) = &options.kind {
        attributes.insert("kind".to_string(), json!(kind));
    }
    if !options.tests.is_empty() {
        attributes.insert("tests-ids".to_string(), json!(options.tests));
    }

    json!({
        "data": {
            "type": "plans",
            "attributes": attributes,
        }
    })
}

/// Public data function - used by both CLI and MCP
pub async fn create_plan_data(
    client: &ApiClient,
    options: &CreateOptions,
) -> Result<String, Error> {
    let payload = create_payload(options);
    let body = client
        .execute(Method::POST, "/plans", &[], Some(&payload))
        .await?;
    let resource = parse_single(&body)
        .ok_or_else(|| Error::Network("Unexpected response shape from /plans".to_string()))?;
    Ok(format!(
        "Created plan {}.\n\n{}",
        resource.id,
        testmat_core::markup::format_resource(&resource, "plan", PLAN_FIELDS)
    ))
}
