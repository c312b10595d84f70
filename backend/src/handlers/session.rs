//! HTTP handlers for analysis session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::{SessionStatus, TrialRecord};

use crate::error::AppResult;
use crate::AppState;

/// Open a new analysis session
pub async fn create_session(State(state): State<AppState>) -> AppResult<Json<SessionStatus>> {
    let status = state.store.create().await?;
    Ok(Json(status))
}

/// Get session status
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionStatus>> {
    let status = state.store.status(session_id).await?;
    Ok(Json(status))
}

/// Discard a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.store.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load or replace the session's record snapshot
pub async fn load_records(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(records): Json<Vec<TrialRecord>>,
) -> AppResult<Json<SessionStatus>> {
    let status = state.store.load_records(session_id, records).await?;
    Ok(Json(status))
}
