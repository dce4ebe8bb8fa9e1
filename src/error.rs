//! Error types for the cache and its read-through proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Config Error Enum ==
/// Raised while turning user-facing settings into a usable cache.
///
/// This is the only error a cache can produce; once built, `put` and `get`
/// are infallible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No duration unit was given
    #[error("Duration unit cannot be empty")]
    EmptyUnit,

    /// Unit is not one of second, minute or hour
    #[error("Unrecognized duration unit: {0}")]
    UnknownUnit(String),

    /// Magnitude was zero or negative
    #[error("Duration magnitude must be a positive integer, got {0}")]
    NonPositiveMagnitude(i64),

    /// Magnitude times unit does not fit in a duration
    #[error("Duration of {magnitude} x {unit} is too large")]
    Overflow { unit: String, magnitude: i64 },

    /// A ready-made duration of zero was passed to the cache
    #[error("Time-to-live must be greater than zero")]
    ZeroTtl,

    /// A setting was present but could not be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

// == Fetch Error Enum ==
/// Failures of a read-through fetch.
///
/// A fetch that fails never leaves a partial entry behind in the cache.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// Payload (cached or fresh) is not valid JSON for the target shape
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller asked for something that cannot be fetched
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No route matches the requested path
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let status = match &self {
            FetchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FetchError::UnknownEndpoint(_) => StatusCode::NOT_FOUND,
            FetchError::Status { status, .. } if *status == 404 => StatusCode::NOT_FOUND,
            FetchError::Request(_) | FetchError::Status { .. } | FetchError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for read-through operations.
pub type Result<T> = std::result::Result<T, FetchError>;
