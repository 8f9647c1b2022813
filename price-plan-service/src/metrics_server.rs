use std::net::SocketAddr;

use anyhow::Context;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const READINGS_STORED_TOTAL: &str = "readings_stored_total";
pub const READINGS_REJECTED_TOTAL: &str = "readings_rejected_total";
pub const COMPARISONS_TOTAL: &str = "price_plan_comparisons_total";
pub const NO_CONSUMPTION_TOTAL: &str = "price_plan_no_consumption_total";
pub const RECOMMENDATIONS_TOTAL: &str = "price_plan_recommendations_total";

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and serve `/metrics` on `bind_addr`.
pub async fn init(bind_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid metrics bind address '{bind_addr}'"))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus metrics recorder")?;
    // Only the first call installs a recorder.
    let _ = PROM_HANDLE.set(handle);

    describe();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {addr}"))?;
    tracing::info!(%addr, "serving Prometheus metrics");

    tokio::spawn(async move {
        let app = Router::new().route("/metrics", get(metrics_handler));
        if let Err(e) = axum::serve(listener, app.into_make_service()).await {
            tracing::error!(error = %e, "metrics server error");
        }
    });

    Ok(())
}

fn describe() {
    metrics::describe_counter!(
        READINGS_STORED_TOTAL,
        "Electricity readings accepted by the store endpoint"
    );
    metrics::describe_counter!(READINGS_REJECTED_TOTAL, "Store requests rejected by validation");
    metrics::describe_counter!(COMPARISONS_TOTAL, "Price plan comparisons computed");
    metrics::describe_counter!(
        NO_CONSUMPTION_TOTAL,
        "Comparisons requested for meters without readings"
    );
    metrics::describe_counter!(RECOMMENDATIONS_TOTAL, "Cheapest plan recommendations served");
}

async fn metrics_handler() -> String {
    PROM_HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}
