//! Trip-planner source error types.

/// Errors from fetching raw trip plans.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by trip planner API")]
    RateLimited,

    /// No plans available for the query (mock sources, unknown fixtures)
    #[error("no trip plans available: {0}")]
    NotFound(String),

    /// Source could not be set up
    #[error("not configured: {0}")]
    NotConfigured(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" (body: {body})"),
        None => String::new(),
    }
}
