use std::time::Duration;

use super::{Classifier, ClassifierError, ClassifyFuture, scores_from_response};

/// Client for the Aurora multi-label SDG classifier.
///
/// Posts `{"text": ...}` as JSON and reads back one prediction per goal.
/// Every call is bounded by `timeout`; the upstream service sometimes
/// stalls under load.
pub struct AuroraClassifier {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl AuroraClassifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), url, timeout)
    }

    /// Share an existing HTTP client (connection pool) with the classifier.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Classifier for AuroraClassifier {
    fn name(&self) -> &str {
        "Aurora"
    }

    fn classify<'a>(&'a self, text: &'a str) -> ClassifyFuture<'a> {
        Box::pin(async move {
            let resp = self
                .client
                .post(&self.url)
                .json(&serde_json::json!({ "text": text }))
                .timeout(self.timeout)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ClassifierError::Status(status.as_u16()));
            }

            let body: serde_json::Value = resp
                .json()
                .await
                .map_err(|e| ClassifierError::Decode(e.to_string()))?;

            Ok(scores_from_response(&body))
        })
    }
}
