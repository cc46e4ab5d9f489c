//! SDG classifier trait and implementations.

pub mod aurora;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::{ClassificationScores, probability_to_percent};

pub use aurora::AuroraClassifier;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier request timed out")]
    Timeout,
    #[error("classifier request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("classifier returned HTTP {0}")]
    Status(u16),
    #[error("invalid classifier response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

pub type ClassifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ClassificationScores, ClassifierError>> + Send + 'a>>;

/// A multi-label classifier scoring text against the SDG taxonomy.
pub trait Classifier: Send + Sync {
    /// Short name used in logs (e.g., "Aurora").
    fn name(&self) -> &str;

    /// Score `text` against every category the classifier knows.
    fn classify<'a>(&'a self, text: &'a str) -> ClassifyFuture<'a>;
}

/// Map a classifier response body to percentage scores.
///
/// Expects `{"predictions": [{"sdg": {"label": ..}, "prediction": 0.42}, ..]}`.
/// Entries without a label or numeric prediction are skipped; a body without
/// `predictions` yields no scores.
pub fn scores_from_response(body: &serde_json::Value) -> ClassificationScores {
    let Some(predictions) = body["predictions"].as_array() else {
        return ClassificationScores::new();
    };

    predictions
        .iter()
        .filter_map(|p| {
            let label = p["sdg"]["label"].as_str()?;
            let prediction = p["prediction"].as_f64()?;
            Some((label.to_string(), probability_to_percent(prediction)))
        })
        .collect()
}
