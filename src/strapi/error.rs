use thiserror::Error;

/// Failures talking to the Strapi REST API.
#[derive(Error, Debug)]
pub enum StrapiError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Failed to send request to Strapi: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response; `message` is unwrapped from Strapi's error envelope
    #[error("Strapi API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Failed to parse Strapi response: {0}")]
    Decode(#[from] serde_json::Error),

    /// JSON was valid but matched none of the known shapes
    #[error("Unexpected response structure from {endpoint}: {body}")]
    UnexpectedShape { endpoint: String, body: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl StrapiError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StrapiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Strapi wraps errors as `{"error": {"message": ...}}`. A non-JSON body is
/// used verbatim; anything else falls back to the status line.
pub(crate) fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let status_line = || {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )
    };

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(status_line),
        Err(_) if !body.trim().is_empty() => body.to_string(),
        Err(_) => status_line(),
    }
}
