use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::MultipartRejection;
use axum::extract::{Multipart, State};
use sdgscan_core::ProcessOutcome;

use crate::error::{AppError, NO_FILE};
use crate::origin::ClientOrigin;
use crate::process::process_upload;
use crate::state::AppState;
use crate::upload;

pub async fn extract_abstract(
    State(state): State<Arc<AppState>>,
    ClientOrigin(origin): ClientOrigin,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessOutcome>, AppError> {
    let multipart = multipart.map_err(|_| AppError::bad_request(NO_FILE))?;
    let file = upload::read_file_field(multipart).await?;
    let outcome = process_upload(&state, &file.filename, &file.data, &origin).await?;
    Ok(Json(outcome))
}
