//! Site benchmark service
//!
//! Positions each site against the snapshot: site mean, top-N mean, and
//! the overall mean across every usable plot.

use std::sync::Arc;

use uuid::Uuid;

use shared::{site_benchmarks, BenchmarkReport, RoundingPolicy};

use crate::error::AppResult;
use crate::services::session::SessionStore;

/// Benchmark service over a session's record snapshot
#[derive(Clone)]
pub struct BenchmarkService {
    store: Arc<SessionStore>,
    rounding: RoundingPolicy,
    default_top_n: u32,
}

impl BenchmarkService {
    pub fn new(store: Arc<SessionStore>, rounding: RoundingPolicy, default_top_n: u32) -> Self {
        Self {
            store,
            rounding,
            default_top_n,
        }
    }

    /// Benchmark report for a session, with an optional top-N override.
    pub async fn report(&self, session_id: Uuid, top_n: Option<u32>) -> AppResult<BenchmarkReport> {
        let records = self.store.records(session_id).await?;
        let top_n = top_n.unwrap_or(self.default_top_n);
        Ok(site_benchmarks(&records, top_n, self.rounding)?)
    }
}
