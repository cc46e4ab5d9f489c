use sdgscan_core::ClassificationScores;
use serde::Deserialize;

use crate::upload::{FALLBACK_FILENAME, secure_filename};

/// Body of `POST /report`.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub sdg: ClassificationScores,
}

/// Query string of `POST /report`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

/// Pull the file URL out of a form-builder webhook payload.
///
/// `upload_1` is either the URL itself or an object carrying `file_url`.
pub fn file_url_from_payload(payload: &serde_json::Value) -> Option<String> {
    let upload = &payload["upload_1"];
    let url = match upload {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(map) => map.get("file_url")?.as_str()?,
        _ => return None,
    };
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Rewrite a plain `http://` URL to `https://`.
pub fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Local name for a downloaded file: the last URL path segment, sanitized.
pub fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .and_then(|segment| secure_filename(&segment))
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
