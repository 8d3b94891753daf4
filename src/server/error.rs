//! Error taxonomy of the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::catalog_store::CatalogError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input or uniqueness conflict: 400.
    #[error("{0}")]
    Validation(String),

    /// Bad login. One message for unknown user, wrong password and
    /// non-administrator accounts: 400.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Write attempt without administrator rights: 403.
    #[error("You do not have permission to perform this action.")]
    Forbidden,

    /// Unresolvable slug at any path level: 404.
    #[error("Not found.")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => ApiError::NotFound,
            CatalogError::Conflict(message) => ApiError::Validation(message),
            CatalogError::Internal(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            ApiError::Internal(err) => {
                error!("Internal error while handling a request: {:#}", err);
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
