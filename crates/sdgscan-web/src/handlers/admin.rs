use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use sdgscan_core::DEFAULT_RECENT_LIMIT;
use sdgscan_reporting::render_dashboard;

use crate::error::AppError;
use crate::state::AppState;

pub async fn admin(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let ledger = Arc::clone(&state.ledger);
    let summary = tokio::task::spawn_blocking(move || ledger.summary(DEFAULT_RECENT_LIMIT))
        .await
        .map_err(|e| AppError::internal(e.to_string()))?
        .map_err(|e| {
            tracing::error!(error = %e, "failed to read ledger");
            AppError::internal(e.to_string())
        })?;
    Ok(Html(render_dashboard(&summary)))
}
