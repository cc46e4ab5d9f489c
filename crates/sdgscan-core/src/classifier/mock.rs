//! Mock classifier for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Classifier, ClassifierError, ClassifyFuture};
use crate::ClassificationScores;

/// A configurable mock response for [`MockClassifier`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    Scores(ClassificationScores),
    /// Simulate a non-success HTTP status.
    Status(u16),
    Timeout,
}

/// A hand-rolled [`Classifier`] that returns a fixed response and records
/// the texts it was asked to classify.
pub struct MockClassifier {
    response: MockResponse,
    texts: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockClassifier {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            texts: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A mock that returns the given `(label, score)` pairs.
    pub fn with_scores(entries: &[(&str, f64)]) -> Self {
        Self::new(MockResponse::Scores(
            entries.iter().map(|(l, s)| (l.to_string(), *s)).collect(),
        ))
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        "Mock"
    }

    fn classify<'a>(&'a self, text: &'a str) -> ClassifyFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut texts) = self.texts.lock() {
            texts.push(text.to_string());
        }
        let response = self.response.clone();
        Box::pin(async move {
            match response {
                MockResponse::Scores(scores) => Ok(scores),
                MockResponse::Status(code) => Err(ClassifierError::Status(code)),
                MockResponse::Timeout => Err(ClassifierError::Timeout),
            }
        })
    }
}
