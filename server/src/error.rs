//! Error types for the store, the HTTP handlers and configuration.
//!
//! # Design
//! `StoreError` is what the storage gateway reports. Handlers turn it into
//! `ApiError`, which owns the status-code mapping: a missing record is 404,
//! mismatched ids are 400, a conflicting commit on a row that still exists is
//! 409, and every other storage failure is 500 so outages are never reported
//! as "not found".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures reported by the storage gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or delete matched no row at commit time.
    #[error("todo item {id} was modified or deleted concurrently")]
    ConcurrencyConflict { id: i64 },

    /// Any other database failure.
    #[error("{operation} failed: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub(crate) fn persistence(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Persistence { operation, source }
    }
}

/// Errors returned by the todo item handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("todo item {id} not found")]
    NotFound { id: i64 },

    #[error("route id {route_id} does not match body id {body_id}")]
    IdMismatch { route_id: i64, body_id: i64 },

    #[error("todo item {id} was modified concurrently")]
    Conflict { id: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::IdMismatch { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Store(StoreError::ConcurrencyConflict { .. }) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Persistence { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Database details stay in the logs.
            ApiError::Store(StoreError::Persistence { .. }) => "internal storage error".to_string(),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Configuration errors raised while reading the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ApiError::NotFound { id: 1 }.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn id_mismatch_maps_to_400() {
        let err = ApiError::IdMismatch {
            route_id: 1,
            body_id: 2,
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "route id 1 does not match body id 2");
    }

    #[test]
    fn persistence_maps_to_500() {
        let err = ApiError::from(StoreError::Persistence {
            operation: "SELECT TodoItems",
            source: sqlx::Error::PoolClosed,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn conflict_maps_to_409() {
        assert_eq!(ApiError::Conflict { id: 5 }.status(), StatusCode::CONFLICT);
        let err = ApiError::from(StoreError::ConcurrencyConflict { id: 5 });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
