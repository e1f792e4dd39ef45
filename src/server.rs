//! HTTP endpoint exposing the aggregator

use crate::{
    aggregator::PriceAggregator,
    error::ApiError,
    types::{AggregatedReport, CanonicalSymbol, ComponentHealth},
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

const MISSING_SYMBOL: &str = "Missing symbol";

/// Builds the service router
///
/// `/api/{symbol}` is kept as an alias of `/price/{symbol}` for clients of
/// the serverless deployment.
pub fn app_router(aggregator: Arc<PriceAggregator>) -> Router {
    Router::new()
        .route("/price/{symbol}", get(get_prices))
        .route("/price", get(missing_symbol))
        .route("/price/", get(missing_symbol))
        .route("/api/{symbol}", get(get_prices))
        .route("/api/", get(missing_symbol))
        .route("/health", get(health))
        .with_state(aggregator)
}

async fn get_prices(
    State(aggregator): State<Arc<PriceAggregator>>,
    Path(symbol): Path<String>,
) -> Result<Json<AggregatedReport>, ApiError> {
    let symbol = CanonicalSymbol::parse(&symbol)
        .ok_or_else(|| ApiError::BadRequest(MISSING_SYMBOL.to_string()))?;

    Ok(Json(aggregator.aggregate(&symbol).await))
}

async fn missing_symbol() -> ApiError {
    ApiError::BadRequest(MISSING_SYMBOL.to_string())
}

async fn health(State(aggregator): State<Arc<PriceAggregator>>) -> Json<ComponentHealth> {
    Json(aggregator.health_check())
}
