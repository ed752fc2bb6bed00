//! Error types for the OneLogin API client.
//!
//! # Design
//! One variant per failure kind a caller can act on. A non-success resource
//! response lands in `Status` with the raw status code and body so the
//! server's explanation is never discarded. Transport failures (DNS, TLS,
//! connection reset) land in `Request` without a status.
//!
//! Header parse problems are not errors at this level; they are recorded on
//! the response envelope instead (see `response::MetadataError`).

use thiserror::Error;

/// Errors returned by the authenticator, path builder and client facade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client credentials are missing or the environment is malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The token or revoke endpoint rejected the credentials, or answered
    /// with a body that carries no usable token.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// A payload could not be encoded to, or decoded from, JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The transport failed before a response was received.
    #[error("request error: {0}")]
    Request(String),

    /// The server answered with a status other than 200, 201 or 204.
    #[error("Error data: {body}. request failed with status: {status}")]
    Status { status: u16, body: String },

    /// An invalid path segment, path shape or query parameter.
    #[error("sdk error: {0}")]
    Sdk(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
