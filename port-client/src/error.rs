//! Error types for the catalog client.

use serde::Deserialize;
use serde_json::Value as Json;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Diagnostic fields of an API error body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub ok: bool,
    /// Machine-readable error code, e.g. `not_found`
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorDetail {
    /// Extract the diagnostic fields; anything unreadable yields the default
    pub fn from_json(value: &Json) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }
}

/// Errors that can occur during catalog client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP round trip itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response envelope reported `ok: false`.
    #[error("failed to {operation}, got: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
        detail: ApiErrorDetail,
    },

    /// The requested resource does not exist.
    #[error("failed to {operation}: not found")]
    NotFound {
        operation: &'static str,
        body: String,
    },

    /// A response body was not the JSON we expected.
    #[error("failed to {operation}: invalid response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl ClientError {
    /// Check if this error means the resource is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Structured error detail, when the API returned one.
    pub fn detail(&self) -> Option<&ApiErrorDetail> {
        match self {
            Self::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }
}
