//! Error responses of the relay endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error types for the report relay
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request body or mail delivery failure
    #[error("Failed to process emergency report: {0}")]
    Processing(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Unauthorized".to_string(),
                    details: None,
                },
            ),
            RelayError::Processing(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Failed to process emergency report".to_string(),
                    details: Some(details),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
