//! HTTP handlers for site benchmark endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::BenchmarkReport;

use crate::error::AppResult;
use crate::services::BenchmarkService;
use crate::AppState;

/// Query parameters for the benchmark report
#[derive(Debug, Deserialize)]
pub struct BenchmarkQuery {
    pub top_n: Option<u32>,
}

/// Site benchmark report over the session's record snapshot
pub async fn get_site_benchmarks(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<BenchmarkQuery>,
) -> AppResult<Json<BenchmarkReport>> {
    let service = BenchmarkService::new(
        state.store.clone(),
        state.rounding,
        state.config.analysis.default_top_n,
    );
    let report = service.report(session_id, query.top_n).await?;
    Ok(Json(report))
}
