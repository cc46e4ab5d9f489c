use axum::extract::Multipart;

use crate::error::{AppError, EMPTY_FILENAME, NO_FILE};

/// Name used when nothing usable survives filename sanitizing.
pub const FALLBACK_FILENAME: &str = "uploaded.pdf";

/// The `file` part of an upload form.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Read the `file` field from a multipart form, ignoring other fields.
pub async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Failed to read form field: {e}")))?
    {
        if field.name() != Some("file") {
            let _ = field.bytes().await;
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        if raw_name.trim().is_empty() {
            return Err(AppError::bad_request(EMPTY_FILENAME));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read file data: {e}")))?
            .to_vec();

        return Ok(UploadedFile {
            filename: secure_filename(&raw_name).unwrap_or_else(|| FALLBACK_FILENAME.to_string()),
            data,
        });
    }

    Err(AppError::bad_request(NO_FILE))
}

/// Reduce a client-supplied name to a safe single path component.
///
/// Path separators become spaces, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// stripped. Returns `None` if nothing is left.
pub fn secure_filename(name: &str) -> Option<String> {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
