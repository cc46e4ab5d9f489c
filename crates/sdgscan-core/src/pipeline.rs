//! Document pipeline: PDF text → sanitize → abstract → SDG scores.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendError, PdfBackend};
use crate::classifier::{Classifier, ClassifierError};
use crate::{ClassificationScores, ExtractedAbstract};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Uniform result shape returned to callers of the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessOutcome {
    Success {
        #[serde(rename = "abstract")]
        abstract_text: String,
        sdg: ClassificationScores,
    },
    Error {
        message: String,
    },
}

impl ProcessOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Everything learned about one document, with the classifier result kept
/// as-is.
#[derive(Debug)]
pub struct DocumentAnalysis {
    pub extracted: ExtractedAbstract,
    pub classification: Result<ClassificationScores, ClassifierError>,
}

impl DocumentAnalysis {
    /// Scores, or an empty mapping if classification failed.
    pub fn scores(&self) -> ClassificationScores {
        self.classification.as_ref().cloned().unwrap_or_default()
    }

    pub fn into_outcome(self) -> ProcessOutcome {
        ProcessOutcome::Success {
            sdg: self.classification.unwrap_or_default(),
            abstract_text: self.extracted.text,
        }
    }
}

/// Runs documents through a PDF backend and a classifier.
#[derive(Clone)]
pub struct Pipeline {
    backend: Arc<dyn PdfBackend>,
    classifier: Arc<dyn Classifier>,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn PdfBackend>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            backend,
            classifier,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Extract the abstract from the PDF at `path` and classify it.
    ///
    /// Text extraction and parsing run on the blocking pool. Only a failure
    /// before classification is an error; the classifier's own result is
    /// returned inside [`DocumentAnalysis`].
    pub async fn analyze(&self, path: &Path) -> Result<DocumentAnalysis, PipelineError> {
        let extracted = self.extract(path).await?;
        let classification = self.classify(&extracted).await;
        Ok(DocumentAnalysis {
            extracted,
            classification,
        })
    }

    /// Like [`analyze`](Self::analyze) but starting from already-extracted text.
    pub async fn analyze_text(&self, text: &str) -> DocumentAnalysis {
        let extracted = extract_from_text(text);
        let classification = self.classify(&extracted).await;
        DocumentAnalysis {
            extracted,
            classification,
        }
    }

    /// Run the full pipeline and fold every outcome into [`ProcessOutcome`].
    pub async fn process_document(&self, path: &Path) -> ProcessOutcome {
        match self.analyze(path).await {
            Ok(analysis) => analysis.into_outcome(),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "document processing failed");
                ProcessOutcome::error(e.to_string())
            }
        }
    }

    /// Extract and parse the PDF without classifying it.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedAbstract, PipelineError> {
        let backend = Arc::clone(&self.backend);
        let path: PathBuf = path.to_path_buf();

        let extracted = tokio::task::spawn_blocking(move || {
            let raw = backend.extract_text(&path)?;
            Ok::<_, BackendError>(extract_from_text(&raw))
        })
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))??;

        tracing::info!(
            tier = extracted.tier.level(),
            method = extracted.tier.description(),
            words = extracted.text.split_whitespace().count(),
            "abstract extracted"
        );
        Ok(extracted)
    }

    async fn classify(
        &self,
        extracted: &ExtractedAbstract,
    ) -> Result<ClassificationScores, ClassifierError> {
        let result = self.classifier.classify(&extracted.text).await;
        match &result {
            Ok(scores) => {
                for (label, score) in scores.sorted_desc() {
                    tracing::info!(label, score, "sdg score");
                }
            }
            Err(e) => {
                tracing::warn!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "classification failed, continuing with no scores"
                );
            }
        }
        result
    }
}

fn extract_from_text(raw: &str) -> ExtractedAbstract {
    let clean = sdgscan_parsing::sanitize(raw);
    sdgscan_parsing::extract_abstract_detailed(&clean)
}
