pub mod error;
pub mod price_plans;
pub mod readings;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pricing_core::{store::InMemoryReadingStore, PricePlanComparator};
use tower_http::trace::TraceLayer;

use crate::{config::AppConfig, seed::seed_store};

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub readings: Arc<InMemoryReadingStore>,
    pub comparator: Arc<PricePlanComparator<InMemoryReadingStore>>,
}

impl AppState {
    /// Build the catalog, account lookup and reading store described by `cfg`,
    /// seeding readings when configured. Plan configuration errors abort here.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let catalog = cfg.catalog().context("invalid price plan configuration")?;
        let accounts = cfg.account_lookup();
        tracing::info!(
            plans = catalog.len(),
            accounts = accounts.len(),
            "loaded price plan catalog"
        );

        let readings = Arc::new(InMemoryReadingStore::new());
        if let Some(seed) = &cfg.seed {
            seed_store(readings.as_ref(), seed).context("failed to seed readings")?;
        }

        let comparator = PricePlanComparator::new(Arc::clone(&readings), catalog, accounts);
        Ok(Self {
            readings,
            comparator: Arc::new(comparator),
        })
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/readings/store", post(readings::store_readings))
        .route("/readings/read/:smart_meter_id", get(readings::read_readings))
        .route("/price-plans/compare-all/:smart_meter_id", get(price_plans::compare_all))
        .route("/price-plans/recommend/:smart_meter_id", get(price_plans::recommend_cheapest))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until Ctrl-C or SIGTERM.
pub async fn serve(bind_addr: &str, app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid http bind address '{bind_addr}'"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;
    tracing::info!(%addr, "price plan service listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("price plan service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
