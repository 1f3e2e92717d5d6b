//! Label operations: list, link

use clap::Args;
use reqwest::Method;
use serde_json::{json, Value};

use testmat_core::fields::LABEL_FIELDS;
use testmat_core::render::render_collection;
use testmat_core::resource::parse_collection;

use crate::client::ApiClient;
use crate::error::Error;
use crate::prelude::{println, *};

/// Label module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "labels")]
#[command(about = "Label operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List labels
    #[clap(name = "list")]
    List(ListOptions),

    /// Link a label to tests or suites
    #[clap(name = "link")]
    Link(LinkOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let client = super::create_client(&global)?;

    let text = match app.command {
        Commands::List(options) => list_labels_data(&client, &options).await?,
        Commands::Link(options) => link_label_data(&client, &options).await?,
    };

    println!("{text}");
    Ok(())
}

/// Options for listing labels
#[derive(Debug, Args, Clone)]
pub struct ListOptions {
    /// Page number
    #[arg(long)]
    pub page: Option<u64>,
}

/// Public data function - used by both CLI and MCP
pub async fn list_labels_data(client: &ApiClient, options: &ListOptions) -> Result<String, Error> {
    let params = match options.page {
        Some(page) => vec![("page".to_string(), page.to_string())],
        None => Vec::new(),
    };

    let body = client.execute(Method::GET, "/labels", &params, None).await?;
    let resources = parse_collection(&body);

    Ok(render_collection("labels", "label", &resources, LABEL_FIELDS, None))
}

/// Options for linking a label
#[derive(Debug, Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Link a label to two tests:
  testmat labels link severity:high --test-id t1 --test-id t2

  # Link a label to a suite:
  testmat labels link flaky --suite-id s1")]
pub struct LinkOptions {
    /// Label slug
    pub slug: String,

    /// Test id to link, repeatable (mutually exclusive with --suite-id)
    #[arg(long = "test-id")]
    pub test_ids: Vec<String>,

    /// Suite id to link, repeatable (mutually exclusive with --test-id)
    #[arg(long = "suite-id")]
    pub suite_ids: Vec<String>,
}

/// Build the link payload, enforcing that exactly one target kind is given.
fn link_payload(options: &LinkOptions) -> Result<Value, Error> {
    match (options.test_ids.is_empty(), options.suite_ids.is_empty()) {
        (false, false) => Err(Error::InvalidParams(
            "supply either test ids or suite ids, not both".to_string(),
        )),
        (true, true) => Err(Error::InvalidParams(
            "supply at least one test id or suite id to link".to_string(),
        )),
        (false, true) => Ok(json!({
            "data": {
                "type": "labels",
                "attributes": { "tests-ids": options.test_ids },
            }
        })),
        (true, false) => Ok(json!({
            "data": {
                "type": "labels",
                "attributes": { "suites-ids": options.suite_ids },
            }
        })),
    }
}

/// Public data function - used by both CLI and MCP
pub async fn link_label_data(client: &ApiClient, options: &LinkOptions) -> Result<String, Error> {
    let payload = link_payload(options)?;
    let path = format!("/labels/{}/link", options.slug);
    client.execute(Method::POST, &path, &[], Some(&payload)).await?;

    let (count, kind) = if options.test_ids.is_empty() {
        (options.suite_ids.len(), "suite(s)")
    } else {
        (options.test_ids.len(), "test(s)")
    };
    Ok(format!(
        "Linked label \"{}\" to {count} {kind}.",
        options.slug
    ))
}
