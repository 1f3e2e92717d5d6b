#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod api;
mod client;
mod error;
mod mcp;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "CLI and MCP server for a test management API"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Long-lived API token, exchanged for a session token at login
    #[clap(long, env = "TESTMAT_API_TOKEN", global = true)]
    api_token: Option<String>,

    /// Project identifier
    #[clap(long, env = "TESTMAT_PROJECT", global = true)]
    project: Option<String>,

    /// API base URL
    #[clap(
        long,
        env = "TESTMAT_BASE_URL",
        global = true,
        default_value = crate::client::Config::DEFAULT_BASE_URL
    )]
    base_url: String,

    /// Whether to display additional information.
    #[clap(long, env = "TESTMAT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Test operations (search, get, create, update)
    Tests(crate::api::tests::App),

    /// Suite operations (search, get, create, update)
    Suites(crate::api::suites::App),

    /// Test run operations (list, get, create)
    Runs(crate::api::runs::App),

    /// Plan operations (list, get, create)
    Plans(crate::api::plans::App),

    /// Label operations (list, link)
    Labels(crate::api::labels::App),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Tests(sub_app) => crate::api::tests::run(sub_app, app.global).await,
        SubCommands::Suites(sub_app) => crate::api::suites::run(sub_app, app.global).await,
        SubCommands::Runs(sub_app) => crate::api::runs::run(sub_app, app.global).await,
        SubCommands::Plans(sub_app) => crate::api::plans::run(sub_app, app.global).await,
        SubCommands::Labels(sub_app) => crate::api::labels::run(sub_app, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
