use anyhow::Result;
use price_plan_service::{api, config::AppConfig, metrics_server, observability, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr).await?;
    }

    // Unknown plan types or bad rates stop startup here.
    let state = AppState::from_config(&cfg)?;
    tracing::info!(meters = state.readings.len(), "reading store ready");

    let app = api::router(state, cfg.server.max_body_bytes);
    api::serve(&cfg.server.http_bind_addr, app).await
}
