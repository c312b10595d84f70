//! HTTP handlers for head-to-head comparison endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::{Comparison, ComparisonRun, PaginatedResponse, Pagination, PairSummary};

use crate::error::AppResult;
use crate::services::head_to_head::{
    GroupComparisonView, GroupSummaryInput, HeadToHeadService, RunComparisonsInput,
};
use crate::AppState;

fn service(state: &AppState) -> HeadToHeadService {
    HeadToHeadService::new(state.store.clone(), state.band, state.rounding)
}

/// Build (or reuse) the session's comparison set
pub async fn run_comparisons(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    input: Option<Json<RunComparisonsInput>>,
) -> AppResult<Json<ComparisonRun>> {
    let service = service(&state);
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let band = service.resolve_band(&input)?;
    let run = service.run(session_id, band).await?;
    Ok(Json(run))
}

/// List the session's comparison table, paginated
pub async fn list_comparisons(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    pagination: Option<Query<Pagination>>,
) -> AppResult<Json<PaginatedResponse<Comparison>>> {
    let service = service(&state);
    let comparisons = service.comparisons(session_id).await?;
    let pagination = pagination.map(|Query(p)| p).unwrap_or_default();
    let (slice, meta) = pagination.apply(&comparisons);
    Ok(Json(PaginatedResponse {
        data: slice.to_vec(),
        pagination: meta,
    }))
}

/// Download the session's comparison table as CSV
pub async fn export_comparisons(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = service(&state);
    let comparisons = service.comparisons(session_id).await?;
    let csv_data = HeadToHeadService::export_to_csv(&comparisons)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"head_to_head.csv\"",
            ),
        ],
        csv_data,
    ))
}

/// Query parameters for the pair summary
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub head: String,
    pub check: String,
}

/// Summarize one head against one check
pub async fn pair_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<PairQuery>,
) -> AppResult<Json<PairSummary>> {
    let service = service(&state);
    let summary = service
        .pair_summary(session_id, &query.head, &query.check)
        .await?;
    Ok(Json(summary))
}

/// Summarize one head against a set of checks
pub async fn group_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<GroupSummaryInput>,
) -> AppResult<Json<GroupComparisonView>> {
    let service = service(&state);
    let view = service.group_summary(session_id, &input).await?;
    Ok(Json(view))
}
