use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use sdgscan_reporting::{ReportFormat, ReportInput, render_report, report_filename};

use crate::error::{AppError, NO_ABSTRACT};
use crate::models::{ReportQuery, ReportRequest};
use crate::state::AppState;

/// Render a report for an already-classified abstract as a download.
pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref().map(str::trim) {
        None | Some("") => ReportFormat::default(),
        Some(f) => f.parse::<ReportFormat>().map_err(AppError::bad_request)?,
    };
    let Json(req) = body.map_err(|e| AppError::bad_request(e.body_text()))?;

    let abstract_text = req
        .abstract_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request(NO_ABSTRACT))?;
    let filename = req.filename.as_deref().unwrap_or("document.pdf");

    let input = ReportInput::new(
        filename,
        abstract_text,
        &req.sdg,
        state.config.relevance_threshold,
    );
    let content = render_report(&input, format);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_filename(filename, format)
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}
