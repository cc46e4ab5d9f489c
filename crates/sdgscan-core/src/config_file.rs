use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub classifier: Option<ClassifierConfig>,
    pub ledger: Option<LedgerConfig>,
    pub download: Option<DownloadConfig>,
    pub geo: Option<GeoConfig>,
    pub pdf: Option<PdfConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub upload_dir: Option<String>,
    pub max_upload_mb: Option<usize>,
    pub trust_proxy: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub relevance_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadConfig {
    pub timeout_secs: Option<u64>,
    pub force_https: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoConfig {
    pub lookup_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    pub page_limit: Option<usize>,
}

/// Platform config directory path: `<config_dir>/sdgscan/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sdgscan").join("config.toml"))
}

/// Load config by cascading CWD `.sdgscan.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".sdgscan.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let over_server = overlay.server.unwrap_or_default();
    let base_classifier = base.classifier.unwrap_or_default();
    let over_classifier = overlay.classifier.unwrap_or_default();
    let base_download = base.download.unwrap_or_default();
    let over_download = overlay.download.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            bind: over_server.bind.or(base_server.bind),
            upload_dir: over_server.upload_dir.or(base_server.upload_dir),
            max_upload_mb: over_server.max_upload_mb.or(base_server.max_upload_mb),
            trust_proxy: over_server.trust_proxy.or(base_server.trust_proxy),
        }),
        classifier: Some(ClassifierConfig {
            url: over_classifier.url.or(base_classifier.url),
            timeout_secs: over_classifier.timeout_secs.or(base_classifier.timeout_secs),
            relevance_threshold: over_classifier
                .relevance_threshold
                .or(base_classifier.relevance_threshold),
        }),
        ledger: Some(LedgerConfig {
            path: overlay
                .ledger
                .and_then(|l| l.path)
                .or_else(|| base.ledger.and_then(|l| l.path)),
        }),
        download: Some(DownloadConfig {
            timeout_secs: over_download.timeout_secs.or(base_download.timeout_secs),
            force_https: over_download.force_https.or(base_download.force_https),
        }),
        geo: Some(GeoConfig {
            lookup_url: overlay
                .geo
                .and_then(|g| g.lookup_url)
                .or_else(|| base.geo.and_then(|g| g.lookup_url)),
        }),
        pdf: Some(PdfConfig {
            page_limit: overlay
                .pdf
                .and_then(|p| p.page_limit)
                .or_else(|| base.pdf.and_then(|p| p.page_limit)),
        }),
    }
}
