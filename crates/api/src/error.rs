use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use params::ValidationError;
use serde::Serialize;
use thiserror::Error;

pub const NO_TRACES: &str = "No EIC traces were extracted from this file and parameter set.";

/// Terminal failure of an EIC request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller's input is at fault (422).
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// The engine or file handling failed (500).
    #[error("{0}")]
    Processing(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub fn processing(cause: impl Display) -> Self {
        Self::Processing(format!("Failed to process mzML file: {cause}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message().to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        (self.status(), Json(ErrorBody { detail: &detail })).into_response()
    }
}
