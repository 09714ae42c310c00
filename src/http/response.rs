//! Error responses.
//!
//! # Responsibilities
//! - Map planning, provider and intake errors to HTTP status codes
//! - Render every failure as `{"error": "<message>"}`
//!
//! # Design Decisions
//! - Client mistakes (bad upload, bad JSON, too few resolved stops) are 4xx
//! - Provider failures are 502, provider timeouts 504
//! - Local I/O failures are 500

use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::maps::MapsError;
use crate::planning::PlanError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (missing field, bad JSON, oversized body).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Spooling or reading the upload failed.
    #[error("failed to process upload: {0}")]
    Io(#[from] io::Error),

    /// Planning stage failure.
    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Plan(PlanError::InsufficientWaypoints { .. })
            | ApiError::Plan(PlanError::TooManyWaypoints { .. })
            | ApiError::Plan(PlanError::NoRoute) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Plan(PlanError::Maps(MapsError::Timeout { .. })) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ApiError::Plan(PlanError::Maps(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<MapsError> for ApiError {
    fn from(error: MapsError) -> Self {
        ApiError::Plan(PlanError::Maps(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Plan(PlanError::Maps(e)) => format!("maps provider error: {}", e),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::types::Api;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(PlanError::InsufficientWaypoints { resolved: 1 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::from(PlanError::NoRoute).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::from(MapsError::Status {
                api: Api::Geocode,
                status: "REQUEST_DENIED".into(),
                message: None,
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(MapsError::Timeout { api: Api::Directions, secs: 10 }).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::from(io::Error::other("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::bad_request("nope").status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_body() {
        let response =
            ApiError::from(PlanError::InsufficientWaypoints { resolved: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("insufficient waypoints"));
    }
}
