use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::extract::ExtractError;

const UNSUPPORTED_FILE_MESSAGE: &str = "Unsupported file type. Please upload a PDF or DOCX file.";
const DECODE_MESSAGE: &str = "Could not read the uploaded document. Please try another file.";
const LIBRARY_UNAVAILABLE_MESSAGE: &str =
    "Document processing is temporarily unavailable. Please try again later.";
const INVALID_JSON_MESSAGE: &str = "Request body must be valid JSON with the expected fields.";
const INVALID_FORM_MESSAGE: &str = "Could not read the uploaded form.";
const NOT_MULTIPART_MESSAGE: &str = "Expected a multipart/form-data upload.";
const PAYLOAD_TOO_LARGE_MESSAGE: &str = "The uploaded file is too large.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl AppError {
    /// The single-line message shown to a user. Never carries the cause.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Extraction(ExtractError::UnsupportedFileType { .. }) => {
                UNSUPPORTED_FILE_MESSAGE.to_string()
            }
            AppError::Extraction(ExtractError::Decode(_)) => DECODE_MESSAGE.to_string(),
            AppError::Extraction(ExtractError::LibraryUnavailable(_)) => {
                LIBRARY_UNAVAILABLE_MESSAGE.to_string()
            }
            AppError::Analysis(e) => e.kind().failure_message().to_string(),
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::Extraction(ExtractError::UnsupportedFileType { .. }) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FILE_TYPE")
            }
            AppError::Extraction(ExtractError::Decode(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR")
            }
            AppError::Extraction(ExtractError::LibraryUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "LIBRARY_UNAVAILABLE")
            }
            AppError::Analysis(AnalysisError::MalformedResponse { .. }) => {
                (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
            }
            AppError::Analysis(AnalysisError::Failed { .. }) => {
                (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Extraction(e) => tracing::warn!("Extraction error: {e}"),
            AppError::Analysis(AnalysisError::Failed { kind, cause }) => {
                tracing::error!(kind = kind.as_str(), "Analysis failed: {cause}")
            }
            AppError::Analysis(AnalysisError::MalformedResponse { kind, reason }) => {
                tracing::warn!(kind = kind.as_str(), "Malformed model response: {reason}")
            }
            _ => {}
        }

        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

// Extractor rejections carry serde or multer detail in their body text.
// Only the status survives; the detail goes to the log.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(PAYLOAD_TOO_LARGE_MESSAGE.to_string())
        } else {
            AppError::Validation(INVALID_JSON_MESSAGE.to_string())
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!("Rejected multipart request: {}", rejection.body_text());
        AppError::Validation(NOT_MULTIPART_MESSAGE.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        tracing::debug!("Failed to read multipart field: {}", e.body_text());
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(PAYLOAD_TOO_LARGE_MESSAGE.to_string())
        } else {
            AppError::Validation(INVALID_FORM_MESSAGE.to_string())
        }
    }
}
