//! Error types for the todo API client.
//!
//! # Design
//! The statuses the server uses to describe a request problem (404, 400,
//! 409) get their own variants so callers can branch on them. Anything else
//! lands in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: the todo item does not exist.
    #[error("resource not found")]
    NotFound,

    /// 400: the request was rejected, e.g. route and body ids differ.
    #[error("bad request: {body}")]
    BadRequest { body: String },

    /// 409: the item changed while the update was being applied.
    #[error("conflict: {body}")]
    Conflict { body: String },

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
