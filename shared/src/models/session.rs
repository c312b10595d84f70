//! Analysis session status models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::comparison::ToleranceBand;

/// Status snapshot of one dashboard user's analysis session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub record_count: u64,
    /// Content hash of the loaded record snapshot; absent until records
    /// are loaded.
    pub dataset_fingerprint: Option<String>,
    pub comparisons_built: bool,
    pub comparison_count: u64,
}

/// Result of one comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRun {
    pub session_id: Uuid,
    pub band: ToleranceBand,
    pub comparison_count: u64,
    /// Whether the cached set for the same snapshot and band was reused.
    pub reused_cache: bool,
    pub built_at: DateTime<Utc>,
}
