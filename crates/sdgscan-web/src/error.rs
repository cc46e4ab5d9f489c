use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sdgscan_core::ProcessOutcome;

pub const NO_FILE: &str = "No file uploaded.";
pub const EMPTY_FILENAME: &str = "Filename is empty.";
pub const NO_FILE_URL: &str = "No valid file URL provided.";
pub const DOWNLOAD_FAILED: &str = "Failed to download file.";
pub const FILE_TOO_LARGE: &str = "File exceeds the upload size limit.";
pub const NO_ABSTRACT: &str = "No abstract provided.";

/// Request failure rendered as `{"status":"error","message":...}`.
#[derive(Debug)]
pub struct AppError(pub StatusCode, pub String);

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(ProcessOutcome::error(self.1))).into_response()
    }
}
