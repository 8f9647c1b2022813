use axum::{
    extract::{Path, Query, State},
    Json,
};
use pricing_core::{PlanComparison, PlanCost, PricingError};
use serde::Deserialize;

use super::{error::ApiError, AppState};
use crate::metrics_server::{COMPARISONS_TOTAL, NO_CONSUMPTION_TOTAL, RECOMMENDATIONS_TOTAL};

#[derive(Debug, Default, Deserialize)]
pub struct RecommendParams {
    pub limit: Option<i64>,
}

/// Negative limits are rejected; zero is a valid, empty recommendation.
fn parse_limit(limit: Option<i64>) -> Result<Option<usize>, ApiError> {
    limit
        .map(|l| usize::try_from(l).map_err(|_| ApiError::InvalidLimit(l)))
        .transpose()
}

fn count_outcome<T>(res: &Result<T, PricingError>) {
    match res {
        Ok(_) => metrics::counter!(COMPARISONS_TOTAL).increment(1),
        Err(PricingError::NoConsumption { meter_id }) => {
            metrics::counter!(NO_CONSUMPTION_TOTAL).increment(1);
            tracing::debug!(meter_id = %meter_id, "no consumption for meter");
        }
        Err(_) => {}
    }
}

/// `GET /price-plans/compare-all/:smart_meter_id`
pub async fn compare_all(
    State(state): State<AppState>,
    Path(smart_meter_id): Path<String>,
) -> Result<Json<PlanComparison>, ApiError> {
    let res = state.comparator.compare_all(&smart_meter_id);
    count_outcome(&res);
    Ok(Json(res?))
}

/// `GET /price-plans/recommend/:smart_meter_id?limit=N`
pub async fn recommend_cheapest(
    State(state): State<AppState>,
    Path(smart_meter_id): Path<String>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<Vec<PlanCost>>, ApiError> {
    let limit = parse_limit(params.limit)?;

    let res = state.comparator.recommend_cheapest(&smart_meter_id, limit);
    count_outcome(&res);
    let recommended = res?;

    metrics::counter!(RECOMMENDATIONS_TOTAL).increment(1);
    Ok(Json(recommended))
}
