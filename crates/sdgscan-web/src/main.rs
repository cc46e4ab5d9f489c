use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sdgscan_core::{AuroraClassifier, Config, Ledger, Pipeline, SqliteLedger};
use sdgscan_pdf_mupdf::MupdfBackend;
use tracing_subscriber::EnvFilter;

mod app;
mod error;
mod handlers;
mod models;
mod origin;
mod process;
mod state;
mod upload;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sdgscan_web=info".parse()?)
                .add_directive("sdgscan_core=info".parse()?),
        )
        .init();

    let config = Config::load();

    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;

    let ledger: Arc<dyn Ledger> = match &config.ledger_path {
        Some(path) => Arc::new(
            SqliteLedger::open(path)
                .with_context(|| format!("failed to open ledger at {}", path.display()))?,
        ),
        None => {
            tracing::warn!("no ledger path configured; upload history is kept in memory only");
            Arc::new(SqliteLedger::in_memory()?)
        }
    };

    let http = state::http_client()?;
    let classifier = Arc::new(AuroraClassifier::with_client(
        http.clone(),
        config.classifier_url.clone(),
        config.classifier_timeout(),
    ));
    let backend = MupdfBackend::new().with_page_limit(config.page_limit);
    let pipeline = Pipeline::new(Arc::new(backend), classifier);

    tracing::info!(
        classifier = %config.classifier_url,
        upload_dir = %config.upload_dir.display(),
        geolocation = config.geo_lookup_url.is_some(),
        "configuration loaded"
    );

    let bind = config.bind.clone();
    let state = Arc::new(AppState::new(config, pipeline, ledger, http));
    let app = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(addr = %bind, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
