//! Error types for the todo API client and state manager.
//!
//! # Design
//! `ApiError` covers everything that can go wrong once a request is issued.
//! `ValidationError` is raised before any request exists. Each `Display`
//! string is written to be shown to a user as-is.

use thiserror::Error;

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the API gateway client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP envelope itself was malformed or unreadable.
    #[error("The server returned an invalid response.")]
    InvalidResponse,

    /// The body matched none of the accepted shapes.
    #[error("The response could not be decoded.")]
    DecodingFailed,

    /// Non-2xx status, with the server's message or one derived from the status.
    #[error("{0}")]
    ServerMessage(String),

    /// DNS, connect, timeout or reset.
    #[error("Network request failed.")]
    NetworkError(#[source] BoxError),

    /// The request payload could not be serialized to JSON.
    #[error("Request could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn network(cause: impl Into<BoxError>) -> Self {
        ApiError::NetworkError(cause.into())
    }
}

/// Client-side title checks, performed before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty.")]
    EmptyTitle,

    #[error("Todo title should be {max} characters or less.")]
    TitleTooLong { max: usize },
}

/// Invalid values in the environment-supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid number of seconds: {value}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be an http(s) URL, got {value}")]
    InvalidBaseUrl { var: &'static str, value: String },
}
