use std::sync::Arc;
use std::time::Duration;

use sdgscan_core::{Config, GeoLocator, Ledger, Pipeline};

/// Upper bound for a single geolocation lookup.
const GEO_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,
    pub ledger: Arc<dyn Ledger>,
    pub geo: Option<GeoLocator>,
    /// Client for webhook downloads and geolocation.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: Pipeline,
        ledger: Arc<dyn Ledger>,
        http: reqwest::Client,
    ) -> Self {
        let geo = config
            .geo_lookup_url
            .as_ref()
            .map(|url| GeoLocator::new(http.clone(), url.clone(), GEO_TIMEOUT));
        Self {
            config,
            pipeline,
            ledger,
            geo,
            http,
        }
    }
}

/// HTTP client shared by the classifier, downloads and geolocation.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("sdgscan/", env!("CARGO_PKG_VERSION")))
        .build()
}
