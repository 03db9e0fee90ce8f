//! Mapping from domain outcomes to HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::models::EntityId;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Every way a request can fail, rendered as [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    /// No user stored under the key.
    NotFound(EntityId),
    /// The service rejected or could not complete the operation.
    Domain(DomainError),
    /// The request body was not acceptable JSON for the endpoint.
    Body(JsonRejection),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(DomainError::ValidationFailed(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Domain(DomainError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Domain(DomainError::SerializationError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Body(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(id) => format!("User not found: {id}"),
            Self::Domain(err) => err.to_string(),
            Self::Body(rejection) => rejection.body_text(),
        };

        if status.is_server_error() {
            tracing::warn!(%status, error = %message, "request failed");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
