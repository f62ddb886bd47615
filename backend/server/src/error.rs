use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{database::StoreError, predictor::PredictorError};

pub const SERVER_ERROR: &str = "Server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Validation(&'static str),

    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(#[from] PredictorError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PredictionUnavailable(_) | AppError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to callers. Server-side failures collapse to a generic
    /// message so predictor and store details stay internal.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MalformedPayload | AppError::Validation(_) => self.to_string(),
            AppError::PredictionUnavailable(_) | AppError::Persistence(_) => {
                SERVER_ERROR.to_string()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected submission body: {rejection}");

        AppError::MalformedPayload
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Rejected history query: {rejection}");

        AppError::MalformedPayload
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{self}");
        }

        (status, Json(json!({ "message": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::Validation("All fields are required");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "All fields are required");
        assert_eq!(AppError::MalformedPayload.public_message(), "Malformed payload");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AppError::from(PredictorError::Timeout(Duration::from_secs(5)));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), SERVER_ERROR);
        assert!(err.to_string().contains("timed out"));
    }
}
