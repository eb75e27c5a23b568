use axum::{
    Router,
    routing::get,
    extract::{State, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::core::report_engine::ReportEngine;
use crate::error::Error;
use crate::observability::metrics;
use crate::report::record::{Degradation, PositionRecord, Report};
use crate::settlement::equity::ExchangeEquity;
use crate::types::balance::Balance;
use crate::types::exchange::Exchange;

pub struct ApiState {
    pub engine: Arc<ReportEngine>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .route("/api/funding", get(funding_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingResponse {
    pub success: bool,
    pub result: Vec<PositionRecord>,
    pub equity_overview: BTreeMap<Exchange, ExchangeEquity>,
    pub total_equity: Balance,
    pub degraded: Vec<Degradation>,
}

impl From<Report> for FundingResponse {
    fn from(report: Report) -> Self {
        FundingResponse {
            success: true,
            result: report.position_records,
            equity_overview: report.equity_overview,
            total_equity: report.total_equity,
            degraded: report.degraded,
        }
    }
}

async fn funding_report(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<FundingResponse>, ApiError> {
    let report = state.engine.run().await?;
    Ok(Json(report.into()))
}

async fn render_metrics() -> Result<String, ApiError> {
    Ok(metrics::render()?)
}

/// Any error reaching a handler is fatal for the request: 500 with `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.0.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
