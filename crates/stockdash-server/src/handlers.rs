//! Route handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use stockdash_core::{
    Company, ComparisonResult, DashError, ForecastResult, TimeSeriesPoint,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Liveness probe
pub async fn alive() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Vec<Company>> {
    Ok(Json(state.insights.companies().await?))
}

pub async fn stock_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Vec<TimeSeriesPoint>> {
    Ok(Json(state.insights.history(&symbol).await?))
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    period: Option<String>,
}

fn parse_period(raw: Option<&str>) -> Result<Option<u32>, DashError> {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(p) => p.parse::<u32>().map(Some).map_err(|_| {
            DashError::InvalidInput(format!("period must be a whole number of days, got '{p}'"))
        }),
    }
}

pub async fn forecast(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<ForecastResult> {
    let period = parse_period(query.period.as_deref())?;
    Ok(Json(state.insights.forecast(&symbol, period).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    stock1: Option<String>,
    #[serde(default)]
    stock2: Option<String>,
}

pub async fn compare(
    State(state): State<AppState>,
    body: Result<Json<CompareRequest>, JsonRejection>,
) -> ApiResult<ComparisonResult> {
    let Json(request) = body?;
    let result = state
        .insights
        .compare(
            request.stock1.as_deref().unwrap_or_default(),
            request.stock2.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(result))
}
