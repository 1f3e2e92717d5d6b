//! Authenticated API client
//!
//! Owns the one piece of state this process carries: the cached session
//! token. The long-lived API token is exchanged for a short-lived session
//! token via the login endpoint; every resource call sends the session token
//! and a 401 observed after using a cached token invalidates it and retries
//! the request exactly once.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::Error;
use crate::prelude::{eyre, Result};

/// Immutable configuration: API token, project id, base URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub project: String,
    pub base_url: String,
}

impl Config {
    /// Default production host.
    pub const DEFAULT_BASE_URL: &'static str = "https://app.testmat.io";

    /// Build a config from raw strings, normalizing whitespace.
    ///
    /// All three fields are trimmed; the base URL additionally has internal
    /// whitespace removed, so a value that arrived split across lines
    /// ("http://\n  localhost:3000") still forms a valid URL.
    pub fn new(api_token: &str, project: &str, base_url: &str) -> Self {
        Self {
            api_token: api_token.trim().to_string(),
            project: project.trim().to_string(),
            base_url: base_url.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// Build a config from the global CLI arguments (flags or env vars).
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let api_token = global
            .api_token
            .as_deref()
            .ok_or_else(|| eyre!("API token not set (use --api-token or TESTMAT_API_TOKEN)"))?;
        let project = global
            .project
            .as_deref()
            .ok_or_else(|| eyre!("Project id not set (use --project or TESTMAT_PROJECT)"))?;

        Ok(Self::new(api_token, project, &global.base_url))
    }
}

/// HTTP client plus the session-token slot.
///
/// The lock is never held across a network call, so two logically concurrent
/// operations may both observe a stale token and both log in again; that
/// costs one extra login round trip and is tolerated.
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    session: Mutex<Option<String>>,
}

impl ApiClient {
    /// Create a client.
    ///
    /// The API specifies no timeout; 30s is our own cutoff so a hung call
    /// fails instead of hanging the tool invocation forever.
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            config,
            session: Mutex::new(None),
        })
    }

    pub fn project(&self) -> &str {
        &self.config.project
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Exchange the API token for a session token, or return the cached one.
    ///
    /// On a failed or malformed login the slot stays empty.
    pub async fn authenticate(&self) -> Result<String, Error> {
        if let Some(token) = self.session.lock().await.clone() {
            return Ok(token);
        }

        let url = format!("{}/api/login", self.base_url());
        let response = self
            .http
            .post(&url)
            .form(&[("api_token", self.config.api_token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                status: status.as_u16(),
                status_text: status_text(status),
                body,
            });
        }

        let body: Value = response.json().await?;
        let token = body
            .get("jwt")
            .and_then(|jwt| jwt.as_str())
            .ok_or(Error::MalformedLogin)?
            .to_string();

        *self.session.lock().await = Some(token.clone());
        Ok(token)
    }

    /// Clear the session slot, but only if it still holds the token the
    /// failed request used. A fresh token stored by a concurrent refresh
    /// must not be clobbered.
    async fn invalidate(&self, stale: &str) {
        let mut session = self.session.lock().await;
        if session.as_deref() == Some(stale) {
            *session = None;
        }
    }

    /// Execute one logical API request.
    ///
    /// URL is `{base}/api/{project}{path}`; the query pairs are appended
    /// as-is (the caller expands arrays to repeated `key[]` entries). The
    /// method is GET when `body` is None, otherwise the given POST/PUT.
    ///
    /// Retry contract: a 401 on an attempt that started with a cached
    /// session token invalidates that token and retries once; a 401 with no
    /// prior cached token (including the post-refresh attempt) is a plain
    /// failure. No other status is retried.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let mut refreshed = false;

        loop {
            let had_cached = self.session.lock().await.is_some();
            let token = self.authenticate().await?;

            let url = format!("{}/api/{}{}", self.base_url(), self.config.project, path);
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(AUTHORIZATION, &token)
                .header(CONTENT_TYPE, "application/json");

            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED && had_cached && !refreshed {
                self.invalidate(&token).await;
                refreshed = true;
                continue;
            }

            if !status.is_success() {
                // Response bodies are only captured for mutating calls.
                let body_text = if method == Method::GET {
                    None
                } else {
                    Some(response.text().await.unwrap_or_default())
                };
                return Err(Error::Api {
                    status: status.as_u16(),
                    status_text: status_text(status),
                    body: body_text,
                });
            }

            return response.json().await.map_err(Error::from);
        }
    }

    /// Whether a session token is currently cached. Exposed for tests.
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}
