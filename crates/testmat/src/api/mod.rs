//! API tool operations, one module per resource kind
//!
//! Each operation is a clap subcommand for the CLI and a public `*_data`
//! function returning the text payload the MCP server hands back to the
//! model. The data functions compose the shared [`ApiClient`] with the core
//! crate's query building and markup rendering; they never catch errors —
//! that happens at the dispatch boundary.

use crate::client::{ApiClient, Config};
use crate::prelude::*;

pub mod labels;
pub mod plans;
pub mod runs;
pub mod suites;
pub mod tests;

/// Build an authenticated client from the global CLI arguments.
pub fn create_client(global: &crate::Global) -> Result<ApiClient> {
    let config = Config::from_global(global)?;
    ApiClient::new(config).map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

// Re-export public data functions for external use (e.g., MCP)
pub use labels::{link_label_data, list_labels_data};
pub use plans::{create_plan_data, get_plan_data, list_plans_data};
pub use runs::{create_run_data, get_run_data, list_runs_data};
pub use suites::{create_suite_data, get_suite_data, search_suites_data, update_suite_data};
pub use tests::{create_test_data, get_test_data, search_tests_data, update_test_data};
