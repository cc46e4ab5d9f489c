use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use sdgscan_core::ProcessOutcome;

use crate::error::{AppError, DOWNLOAD_FAILED, FILE_TOO_LARGE, NO_FILE_URL};
use crate::models::{file_url_from_payload, filename_from_url, upgrade_to_https};
use crate::origin::ClientOrigin;
use crate::process::process_upload;
use crate::state::AppState;

/// Form-builder webhook: download the submitted PDF and process it.
pub async fn forminator_webhook(
    State(state): State<Arc<AppState>>,
    ClientOrigin(origin): ClientOrigin,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ProcessOutcome>, AppError> {
    let Ok(Json(payload)) = payload else {
        return Err(AppError::bad_request(NO_FILE_URL));
    };
    tracing::debug!(%payload, "webhook payload received");

    let url = file_url_from_payload(&payload).ok_or_else(|| AppError::bad_request(NO_FILE_URL))?;
    let url = if state.config.force_https_downloads {
        upgrade_to_https(&url)
    } else {
        url
    };

    let data = download(&state, &url).await?;
    let filename = filename_from_url(&url);
    let outcome = process_upload(&state, &filename, &data, &origin).await?;
    Ok(Json(outcome))
}

/// Fetch `url`, refusing bodies larger than the upload limit.
async fn download(state: &AppState, url: &str) -> Result<Vec<u8>, AppError> {
    let limit = state.config.max_upload_bytes();

    let mut resp = state
        .http
        .get(url)
        .timeout(state.config.download_timeout())
        .send()
        .await
        .map_err(|e| {
            tracing::error!(%url, error = %e, "webhook download failed");
            AppError::internal(e.to_string())
        })?;
    if resp.status() != reqwest::StatusCode::OK {
        tracing::warn!(%url, status = %resp.status(), "webhook download rejected");
        return Err(AppError::bad_request(DOWNLOAD_FAILED));
    }
    if resp.content_length().is_some_and(|len| len > limit as u64) {
        tracing::warn!(%url, limit, "webhook download too large");
        return Err(AppError::bad_request(FILE_TOO_LARGE));
    }

    let mut data = Vec::new();
    while let Some(chunk) = resp.chunk().await.map_err(|e| {
        tracing::error!(%url, error = %e, "webhook download interrupted");
        AppError::internal(e.to_string())
    })? {
        if data.len() + chunk.len() > limit {
            tracing::warn!(%url, limit, "webhook download too large");
            return Err(AppError::bad_request(FILE_TOO_LARGE));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
