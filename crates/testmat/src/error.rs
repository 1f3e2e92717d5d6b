/// Error taxonomy for the API client and tool operations.
///
/// The request executor recovers exactly one failure class on its own (a 401
/// after having used a cached session token, retried once); everything else
/// surfaces through these variants to the dispatch boundary, which renders
/// the error as text rather than crashing.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The login exchange failed with a non-success status.
    #[error("Authentication failed [{status} {status_text}]: {body}")]
    Authentication {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The login exchange succeeded but returned no session token.
    #[error("Authentication failed: login response did not contain a session token")]
    MalformedLogin,

    /// A resource call failed with a non-recoverable status.
    #[error("{}", api_error_message(.status, .status_text, .body))]
    Api {
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    /// An invalid parameter combination supplied to a tool operation.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Transport-level failure (connection refused, timeout, bad JSON).
    #[error("Network error: {0}")]
    Network(String),
}

fn api_error_message(status: &u16, status_text: &str, body: &Option<String>) -> String {
    match body {
        Some(body) if !body.is_empty() => {
            format!("API request failed [{status} {status_text}]: {body}")
        }
        _ => format!("API request failed [{status} {status_text}]"),
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}
