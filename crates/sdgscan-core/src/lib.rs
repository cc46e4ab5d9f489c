use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod backend;
pub mod classifier;
pub mod config_file;
pub mod geo;
pub mod ledger;
pub mod pipeline;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use classifier::{AuroraClassifier, Classifier, ClassifierError};
pub use config_file::ConfigFile;
pub use geo::GeoLocator;
pub use ledger::{DEFAULT_RECENT_LIMIT, Ledger, LedgerError, LedgerSummary, SqliteLedger, UploadEvent};
pub use pipeline::{DocumentAnalysis, Pipeline, PipelineError, ProcessOutcome};
pub use sdgscan_parsing::{ExtractedAbstract, ExtractionTier, StopHeading};

/// Default endpoint of the Aurora multi-label SDG classifier.
pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://aurora-sdg.labs.vu.nl/classifier/classify/aurora-sdg-multi";

/// Score (in percent) a category must exceed to count as relevant.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 30.0;

/// Relevance scores per SDG label, in percent with two decimals.
///
/// Stored unordered (keyed by label); use [`sorted_desc`](Self::sorted_desc)
/// for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationScores(BTreeMap<String, f64>);

impl ClassificationScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        self.0.insert(label.into(), score);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Scores from highest to lowest; equal scores are ordered by label.
    pub fn sorted_desc(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Labels whose score is strictly above `threshold`, highest first.
    pub fn triggered(&self, threshold: f64) -> Vec<String> {
        self.sorted_desc()
            .into_iter()
            .filter(|(_, score)| *score > threshold)
            .map(|(label, _)| label.to_string())
            .collect()
    }
}

impl FromIterator<(String, f64)> for ClassificationScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Convert a 0..1 classifier probability to a percentage rounded to two decimals.
///
/// Rounds the exact binary value of `prediction * 100`, so a product stored
/// just below a `.xx5` tie rounds down.
pub fn probability_to_percent(prediction: f64) -> f64 {
    format!("{:.2}", prediction * 100.0).parse().unwrap_or(0.0)
}

/// Runtime configuration shared by the web server and the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web server binds to.
    pub bind: String,
    /// Directory holding uploaded PDFs while they are processed.
    pub upload_dir: PathBuf,
    pub max_upload_mb: usize,
    /// Take the requester origin from `X-Forwarded-For`. Only enable behind
    /// a proxy that sets the header.
    pub trust_proxy: bool,
    pub classifier_url: String,
    pub classifier_timeout_secs: u64,
    pub relevance_threshold: f64,
    /// SQLite ledger file. `None` keeps the ledger in memory.
    pub ledger_path: Option<PathBuf>,
    pub download_timeout_secs: u64,
    /// Rewrite `http://` webhook file URLs to `https://` before downloading.
    pub force_https_downloads: bool,
    /// Read at most this many PDF pages. `0` reads the whole document.
    pub page_limit: usize,
    /// Geolocation endpoint template with an `{ip}` placeholder.
    pub geo_lookup_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_mb: 50,
            trust_proxy: false,
            classifier_url: DEFAULT_CLASSIFIER_URL.to_string(),
            classifier_timeout_secs: 30,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            ledger_path: None,
            download_timeout_secs: 60,
            force_https_downloads: true,
            page_limit: 0,
            geo_lookup_url: None,
        }
    }
}

impl Config {
    /// Resolve configuration: env vars > `.sdgscan.toml` > platform config > defaults.
    pub fn load() -> Self {
        Self::from_file(&config_file::load_config()).with_env(|key| std::env::var(key).ok())
    }

    /// Apply the values present in a config file over the defaults.
    pub fn from_file(file: &ConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(server) = &file.server {
            if let Some(bind) = &server.bind {
                config.bind = bind.clone();
            }
            if let Some(dir) = &server.upload_dir {
                config.upload_dir = PathBuf::from(dir);
            }
            if let Some(mb) = server.max_upload_mb {
                config.max_upload_mb = mb;
            }
            if let Some(trust) = server.trust_proxy {
                config.trust_proxy = trust;
            }
        }
        if let Some(classifier) = &file.classifier {
            if let Some(url) = &classifier.url {
                config.classifier_url = url.clone();
            }
            if let Some(secs) = classifier.timeout_secs {
                config.classifier_timeout_secs = secs;
            }
            if let Some(threshold) = classifier.relevance_threshold {
                config.relevance_threshold = threshold;
            }
        }
        if let Some(path) = file.ledger.as_ref().and_then(|l| l.path.as_ref()) {
            config.ledger_path = Some(PathBuf::from(path));
        }
        if let Some(download) = &file.download {
            if let Some(secs) = download.timeout_secs {
                config.download_timeout_secs = secs;
            }
            if let Some(force) = download.force_https {
                config.force_https_downloads = force;
            }
        }
        if let Some(pages) = file.pdf.as_ref().and_then(|p| p.page_limit) {
            config.page_limit = pages;
        }
        if let Some(url) = file.geo.as_ref().and_then(|g| g.lookup_url.as_ref()) {
            config.geo_lookup_url = Some(url.clone());
        }
        config
    }

    /// Override values from environment variables, read through `var`.
    ///
    /// `PORT` rebinds on all interfaces; `SDGSCAN_BIND` takes precedence over it.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = var("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.bind = format!("0.0.0.0:{port}");
        }
        if let Some(bind) = var("SDGSCAN_BIND") {
            self.bind = bind;
        }
        if let Some(dir) = var("SDGSCAN_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(mb) = var("SDGSCAN_MAX_UPLOAD_MB").and_then(|v| v.parse().ok()) {
            self.max_upload_mb = mb;
        }
        if let Some(trust) = var("SDGSCAN_TRUST_PROXY").and_then(|v| parse_bool(&v)) {
            self.trust_proxy = trust;
        }
        if let Some(url) = var("SDGSCAN_CLASSIFIER_URL") {
            self.classifier_url = url;
        }
        if let Some(secs) = var("SDGSCAN_CLASSIFIER_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.classifier_timeout_secs = secs;
        }
        if let Some(threshold) = var("SDGSCAN_RELEVANCE_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.relevance_threshold = threshold;
        }
        if let Some(path) = var("SDGSCAN_LEDGER_PATH") {
            self.ledger_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = var("SDGSCAN_DOWNLOAD_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.download_timeout_secs = secs;
        }
        if let Some(force) = var("SDGSCAN_FORCE_HTTPS").and_then(|v| parse_bool(&v)) {
            self.force_https_downloads = force;
        }
        if let Some(pages) = var("SDGSCAN_PAGE_LIMIT").and_then(|v| v.parse().ok()) {
            self.page_limit = pages;
        }
        if let Some(url) = var("SDGSCAN_GEO_LOOKUP_URL") {
            self.geo_lookup_url = Some(url);
        }
        self
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Upload and download size cap in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
