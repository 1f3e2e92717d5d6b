//! MCP tool catalog and dispatch for the test management API
//!
//! Every tool maps one-to-one onto a `*_data` function from the `api`
//! module. Execution failures (authentication, API, invalid parameters) are
//! returned in-band as an error text block with `isError` set, so a tool
//! invocation always succeeds at the protocol level; JSON-RPC errors are
//! reserved for malformed requests and unknown tools.

use serde::Deserialize;

use super::{CallToolResult, Content, JsonRpcError, Tool};
use crate::api;
use crate::client::ApiClient;
use crate::error::Error;
use crate::prelude::eprintln;

pub fn tool_catalog() -> Vec<Tool> {
    vec![
        Tool {
            name: "search_tests".to_string(),
            description: "Search tests in the project. The query is free text; a query starting with @ is a tag search (e.g., '@smoke'), and an issue key like 'PROJ-123' is described as an issue reference. Supports suite, plan, state, priority, and label filters. Returns tests as semantic markup.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Free-text query, '@tag', or issue key" },
                    "suite_id": { "type": "string", "description": "Restrict to a suite" },
                    "plan_id": { "type": "string", "description": "Restrict to a plan" },
                    "state": { "type": "string", "description": "Filter by state (e.g., manual, automated)" },
                    "priority": { "type": "string", "description": "Filter by priority (e.g., high, normal, low)" },
                    "labels": { "type": "array", "items": { "type": "string" }, "description": "Filter by labels" },
                    "page": { "type": "number", "description": "Page number, 1-indexed" }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_test".to_string(),
            description: "Get a single test by id, rendered as semantic markup.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "test_id": { "type": "string", "description": "Test id" }
                },
                "required": ["test_id"]
            }),
        },
        Tool {
            name: "create_test".to_string(),
            description: "Create a test. @word tokens in the title are extracted as tags and merged with the explicit tags list (explicit first, leading @ stripped).".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Test title; @word tokens become tags" },
                    "description": { "type": "string", "description": "Test description" },
                    "suite_id": { "type": "string", "description": "Suite to create the test in" },
                    "priority": { "type": "string", "description": "Priority (e.g., high, normal, low)" },
                    "state": { "type": "string", "description": "State (e.g., manual, automated)" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Explicit tags" },
                    "label_ids": { "type": "array", "items": { "type": "string" }, "description": "Label ids to attach" }
                },
                "required": ["title"]
            }),
        },
        Tool {
            name: "update_test".to_string(),
            description: "Update a test. Only supplied fields are changed; @word tokens in a new title are merged into the tags.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "test_id": { "type": "string", "description": "Test id" },
                    "title": { "type": "string", "description": "New title" },
                    "description": { "type": "string", "description": "New description" },
                    "priority": { "type": "string", "description": "New priority" },
                    "state": { "type": "string", "description": "New state" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Explicit tags" },
                    "label_ids": { "type": "array", "items": { "type": "string" }, "description": "Label ids to attach" }
                },
                "required": ["test_id"]
            }),
        },
        Tool {
            name: "search_suites".to_string(),
            description: "Search suites by free text. Returns suites as semantic markup.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Free-text query" },
                    "page": { "type": "number", "description": "Page number, 1-indexed" }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_suite".to_string(),
            description: "Get a single suite by id, rendered as semantic markup.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "suite_id": { "type": "string", "description": "Suite id" }
                },
                "required": ["suite_id"]
            }),
        },
        Tool {
            name: "create_suite".to_string(),
            description: "Create a suite (a file or folder grouping tests).".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Suite title" },
                    "description": { "type": "string", "description": "Suite description" },
                    "parent_id": { "type": "string", "description": "Parent suite id" },
                    "file_type": { "type": "string", "description": "file or folder" }
                },
                "required": ["title"]
            }),
        },
        Tool {
            name: "update_suite".to_string(),
            description: "Update a suite. Only supplied fields are changed.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "suite_id": { "type": "string", "description": "Suite id" },
                    "title": { "type": "string", "description": "New title" },
                    "description": { "type": "string", "description": "New description" },
                    "parent_id": { "type": "string", "description": "New parent suite id" }
                },
                "required": ["suite_id"]
            }),
        },
        Tool {
            name: "list_runs".to_string(),
            description: "List test runs, optionally filtered by status.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "status": { "type": "string", "description": "Filter by status (e.g., passed, failed, running)" },
                    "page": { "type": "number", "description": "Page number, 1-indexed" }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_run".to_string(),
            description: "Get a single test run by id, rendered as semantic markup.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "run_id": { "type": "string", "description": "Run id" }
                },
                "required": ["run_id"]
            }),
        },
        Tool {
            name: "create_run".to_string(),
            description: "Create a test run, optionally scoped to a plan or a set of tags.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Run title" },
                    "env": { "type": "string", "description": "Environment label (e.g., staging, chrome)" },
                    "plan_id": { "type": "string", "description": "Plan to run" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Tags to run" }
                },
                "required": ["title"]
            }),
        },
        Tool {
            name: "list_plans".to_string(),
            description: "List plans, optionally filtered by kind.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "kind": { "type": "string", "description": "Filter by kind (e.g., manual, automated, mixed)" },
                    "page": { "type": "number", "description": "Page number, 1-indexed" }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_plan".to_string(),
            description: "Get a single plan by id, rendered as semantic markup.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "plan_id": { "type": "string", "description": "Plan id" }
                },
                "required": ["plan_id"]
            }),
        },
        Tool {
            name: "create_plan".to_string(),
            description: "Create a plan from a list of test ids.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Plan title" },
                    "kind": { "type": "string", "description": "Plan kind (e.g., manual, automated, mixed)" },
                    "test_ids": { "type": "array", "items": { "type": "string" }, "description": "Tests to include" }
                },
                "required": ["title"]
            }),
        },
        Tool {
            name: "list_labels".to_string(),
            description: "List the labels defined in the project.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "page": { "type": "number", "description": "Page number, 1-indexed" }
                },
                "required": []
            }),
        },
        Tool {
            name: "link_label".to_string(),
            description: "Link a label to tests or to suites. Supply exactly one of test_ids or suite_ids; both at once is an error.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "slug": { "type": "string", "description": "Label slug" },
                    "test_ids": { "type": "array", "items": { "type": "string" }, "description": "Tests to link" },
                    "suite_ids": { "type": "array", "items": { "type": "string" }, "description": "Suites to link" }
                },
                "required": ["slug"]
            }),
        },
    ]
}

pub async fn dispatch(
    name: &str,
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    if global.verbose {
        eprintln!("Calling {name}: {arguments:?}");
    }

    match name {
        "search_tests" => handle_search_tests(arguments, client).await,
        "get_test" => handle_get_test(arguments, client).await,
        "create_test" => handle_create_test(arguments, client).await,
        "update_test" => handle_update_test(arguments, client).await,
        "search_suites" => handle_search_suites(arguments, client).await,
        "get_suite" => handle_get_suite(arguments, client).await,
        "create_suite" => handle_create_suite(arguments, client).await,
        "update_suite" => handle_update_suite(arguments, client).await,
        "list_runs" => handle_list_runs(arguments, client).await,
        "get_run" => handle_get_run(arguments, client).await,
        "create_run" => handle_create_run(arguments, client).await,
        "list_plans" => handle_list_plans(arguments, client).await,
        "get_plan" => handle_get_plan(arguments, client).await,
        "create_plan" => handle_create_plan(arguments, client).await,
        "list_labels" => handle_list_labels(arguments, client).await,
        "link_label" => handle_link_label(arguments, client).await,
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {name}"),
            data: None,
        }),
    }
}

/// Deserialize the tool arguments; a shape mismatch is a protocol error.
/// Absent arguments are treated as an empty object so tools whose inputs
/// are all optional can be called bare.
fn parse_args<T: for<'de> Deserialize<'de>>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    let arguments =
        arguments.unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    serde_json::from_value(arguments).map_err(|e| JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    })
}

/// Wrap a tool outcome as an MCP result.
///
/// Failures become an in-band error text block with `isError` set; the
/// protocol response itself still succeeds.
fn tool_result(outcome: Result<String, Error>) -> Result<serde_json::Value, JsonRpcError> {
    let result = match outcome {
        Ok(text) => CallToolResult {
            content: vec![Content::Text { text }],
            is_error: None,
        },
        Err(e) => CallToolResult {
            content: vec![Content::Text {
                text: format!("Error: {e}"),
            }],
            is_error: Some(true),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

async fn handle_search_tests(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        query: Option<String>,
        suite_id: Option<String>,
        plan_id: Option<String>,
        state: Option<String>,
        priority: Option<String>,
        labels: Option<Vec<String>>,
        page: Option<u64>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::tests::SearchOptions {
        query: args.query,
        suite: args.suite_id,
        plan: args.plan_id,
        state: args.state,
        priority: args.priority,
        labels: args.labels.unwrap_or_default(),
        page: args.page,
        json: false,
    };

    tool_result(api::search_tests_data(client, &options).await)
}

async fn handle_get_test(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        test_id: String,
    }

    let args: Args = parse_args(arguments)?;
    tool_result(api::get_test_data(client, &args.test_id).await)
}

async fn handle_create_test(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        title: String,
        description: Option<String>,
        suite_id: Option<String>,
        priority: Option<String>,
        state: Option<String>,
        tags: Option<Vec<String>>,
        label_ids: Option<Vec<String>>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::tests::CreateOptions {
        title: args.title,
        description: args.description,
        suite: args.suite_id,
        priority: args.priority,
        state: args.state,
        tags: args.tags.unwrap_or_default(),
        labels: args.label_ids.unwrap_or_default(),
        json: false,
    };

    tool_result(api::create_test_data(client, &options).await)
}

async fn handle_update_test(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        test_id: String,
        title: Option<String>,
        description: Option<String>,
        priority: Option<String>,
        state: Option<String>,
        tags: Option<Vec<String>>,
        label_ids: Option<Vec<String>>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::tests::UpdateOptions {
        id: args.test_id,
        title: args.title,
        description: args.description,
        priority: args.priority,
        state: args.state,
        tags: args.tags.unwrap_or_default(),
        labels: args.label_ids.unwrap_or_default(),
    };

    tool_result(api::update_test_data(client, &options).await)
}

async fn handle_search_suites(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        query: Option<String>,
        page: Option<u64>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::suites::SearchOptions {
        query: args.query,
        page: args.page,
    };

    tool_result(api::search_suites_data(client, &options).await)
}

async fn handle_get_suite(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        suite_id: String,
    }

    let args: Args = parse_args(arguments)?;
    tool_result(api::get_suite_data(client, &args.suite_id).await)
}

async fn handle_create_suite(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        title: String,
        description: Option<String>,
        parent_id: Option<String>,
        file_type: Option<String>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::suites::CreateOptions {
        title: args.title,
        description: args.description,
        parent: args.parent_id,
        file_type: args.file_type,
    };

    tool_result(api::create_suite_data(client, &options).await)
}

async fn handle_update_suite(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        suite_id: String,
        title: Option<String>,
        description: Option<String>,
        parent_id: Option<String>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::suites::UpdateOptions {
        id: args.suite_id,
        title: args.title,
        description: args.description,
        parent: args.parent_id,
    };

    tool_result(api::update_suite_data(client, &options).await)
}

async fn handle_list_runs(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        status: Option<String>,
        page: Option<u64>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::runs::ListOptions {
        status: args.status,
        page: args.page,
    };

    tool_result(api::list_runs_data(client, &options).await)
}

async fn handle_get_run(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        run_id: String,
    }

    let args: Args = parse_args(arguments)?;
    tool_result(api::get_run_data(client, &args.run_id).await)
}

async fn handle_create_run(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        title: String,
        env: Option<String>,
        plan_id: Option<String>,
        tags: Option<Vec<String>>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::runs::CreateOptions {
        title: args.title,
        env: args.env,
        plan: args.plan_id,
        tags: args.tags.unwrap_or_default(),
    };

    tool_result(api::create_run_data(client, &options).await)
}

async fn handle_list_plans(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        kind: Option<String>,
        page: Option<u64>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::plans::ListOptions {
        kind: args.kind,
        page: args.page,
    };

    tool_result(api::list_plans_data(client, &options).await)
}

async fn handle_get_plan(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        plan_id: String,
    }

    let args: Args = parse_args(arguments)?;
    tool_result(api::get_plan_data(client, &args.plan_id).await)
}

async fn handle_create_plan(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        title: String,
        kind: Option<String>,
        test_ids: Option<Vec<String>>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::plans::CreateOptions {
        title: args.title,
        kind: args.kind,
        tests: args.test_ids.unwrap_or_default(),
    };

    tool_result(api::create_plan_data(client, &options).await)
}

async fn handle_list_labels(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        page: Option<u64>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::labels::ListOptions { page: args.page };

    tool_result(api::list_labels_data(client, &options).await)
}

async fn handle_link_label(
    arguments: Option<serde_json::Value>,
    client: &ApiClient,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct Args {
        slug: String,
        test_ids: Option<Vec<String>>,
        suite_ids: Option<Vec<String>>,
    }

    let args: Args = parse_args(arguments)?;
    let options = api::labels::LinkOptions {
        slug: args.slug,
        test_ids: args.test_ids.unwrap_or_default(),
        suite_ids: args.suite_ids.unwrap_or_default(),
    };

    tool_result(api::link_label_data(client, &options).await)
}
