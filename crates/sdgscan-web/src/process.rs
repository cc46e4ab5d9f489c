//! Shared path for uploaded and downloaded documents.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use sdgscan_core::{ProcessOutcome, UploadEvent};
use tempfile::NamedTempFile;

use crate::error::AppError;
use crate::state::AppState;

/// Store `data` in the upload directory, run the pipeline on it and record
/// the upload in the ledger. The stored copy is removed before returning.
pub async fn process_upload(
    state: &AppState,
    filename: &str,
    data: &[u8],
    origin: &str,
) -> Result<ProcessOutcome, AppError> {
    let stored = store_upload(&state.config.upload_dir, filename, data).map_err(|e| {
        tracing::error!(filename, error = %e, "failed to store upload");
        AppError::internal(format!("Failed to store upload: {e}"))
    })?;

    tracing::info!(filename, origin, bytes = data.len(), "processing document");
    let outcome = state.pipeline.process_document(stored.path()).await;
    drop(stored);

    record_upload(state, filename, origin, &outcome).await;
    Ok(outcome)
}

fn store_upload(dir: &Path, filename: &str, data: &[u8]) -> std::io::Result<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!("-{filename}"))
        .tempfile_in(dir)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}

async fn record_upload(state: &AppState, filename: &str, origin: &str, outcome: &ProcessOutcome) {
    let location = match &state.geo {
        Some(geo) => geo.locate(origin).await,
        None => None,
    };
    let triggered = match outcome {
        ProcessOutcome::Success { sdg, .. } => Some(sdg.triggered(state.config.relevance_threshold)),
        ProcessOutcome::Error { .. } => None,
    };
    let event = UploadEvent::new(filename, origin)
        .with_location(location)
        .with_triggered(triggered);

    let ledger = Arc::clone(&state.ledger);
    match tokio::task::spawn_blocking(move || ledger.record(&event)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(filename, error = %e, "failed to record upload"),
        Err(e) => tracing::warn!(filename, error = %e, "ledger task failed"),
    }
}
