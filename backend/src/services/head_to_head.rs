//! Head-to-head comparison service
//!
//! Wraps the pure comparison engine with session-scoped caching and the
//! pair/group summary views the dashboard renders. A run is reused as
//! long as the snapshot fingerprint and the band are unchanged; anything
//! else triggers a full rebuild, never an incremental update.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{
    build_comparisons, head_mean_across, summarize_group, summarize_pair, Comparison,
    ComparisonRun, GroupSummary, PairSummary, RoundingPolicy, ToleranceBand,
};

use crate::error::{AppError, AppResult};
use crate::services::session::{ComparisonCache, SessionStore};

/// Head-to-head service for building and summarizing comparison sets
#[derive(Clone)]
pub struct HeadToHeadService {
    store: Arc<SessionStore>,
    default_band: ToleranceBand,
    rounding: RoundingPolicy,
}

/// Input for triggering a comparison run
#[derive(Debug, Default, Deserialize)]
pub struct RunComparisonsInput {
    /// Override for the lower draw-band edge (sc/ha)
    pub tolerance_lo: Option<Decimal>,
    /// Override for the upper draw-band edge (sc/ha)
    pub tolerance_hi: Option<Decimal>,
}

/// Input for the one-vs-many summary
#[derive(Debug, Deserialize)]
pub struct GroupSummaryInput {
    pub head: String,
    pub checks: Vec<String>,
}

/// Group summary response: the head's overall mean plus one row per check
#[derive(Debug, Serialize)]
pub struct GroupComparisonView {
    pub head: String,
    pub head_mean: Option<Decimal>,
    pub rows: Vec<GroupSummary>,
}

impl HeadToHeadService {
    pub fn new(store: Arc<SessionStore>, default_band: ToleranceBand, rounding: RoundingPolicy) -> Self {
        Self {
            store,
            default_band,
            rounding,
        }
    }

    /// Resolve the band for a run from the configured default and any
    /// per-request overrides.
    pub fn resolve_band(&self, input: &RunComparisonsInput) -> AppResult<ToleranceBand> {
        let lo = input.tolerance_lo.unwrap_or(self.default_band.lo);
        let hi = input.tolerance_hi.unwrap_or(self.default_band.hi);
        Ok(ToleranceBand::new(lo, hi)?)
    }

    /// Build (or reuse) the session's comparison set.
    pub async fn run(&self, session_id: Uuid, band: ToleranceBand) -> AppResult<ComparisonRun> {
        let fingerprint = self
            .store
            .fingerprint(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Record snapshot".to_string()))?;

        if let Some(cache) = self.store.cache(session_id).await? {
            if cache.fingerprint == fingerprint && cache.band == band {
                tracing::info!(session_id = %session_id, "comparison cache reused");
                return Ok(ComparisonRun {
                    session_id,
                    band,
                    comparison_count: cache.comparisons.len() as u64,
                    reused_cache: true,
                    built_at: cache.built_at,
                });
            }
        }

        let records = self.store.records(session_id).await?;
        let comparisons = build_comparisons(&records, band, self.rounding)?;
        let built_at = Utc::now();
        let count = comparisons.len() as u64;

        self.store
            .store_cache(
                session_id,
                ComparisonCache {
                    fingerprint,
                    band,
                    comparisons: Arc::new(comparisons),
                    built_at,
                },
            )
            .await?;

        tracing::info!(
            session_id = %session_id,
            comparison_count = count,
            "comparison set built"
        );
        Ok(ComparisonRun {
            session_id,
            band,
            comparison_count: count,
            reused_cache: false,
            built_at,
        })
    }

    /// The session's full comparison table.
    pub async fn comparisons(&self, session_id: Uuid) -> AppResult<Arc<Vec<Comparison>>> {
        self.store.comparisons(session_id).await
    }

    /// One head against one check across their shared sites.
    pub async fn pair_summary(
        &self,
        session_id: Uuid,
        head: &str,
        check: &str,
    ) -> AppResult<PairSummary> {
        let comparisons = self.store.comparisons(session_id).await?;
        Ok(summarize_pair(&comparisons, head, check, self.rounding)?)
    }

    /// One head against a set of checks, in the order supplied.
    pub async fn group_summary(
        &self,
        session_id: Uuid,
        input: &GroupSummaryInput,
    ) -> AppResult<GroupComparisonView> {
        let comparisons = self.store.comparisons(session_id).await?;
        let rows = summarize_group(&comparisons, &input.head, &input.checks, self.rounding)?;
        let head_mean = head_mean_across(&comparisons, &input.head, &input.checks, self.rounding);
        Ok(GroupComparisonView {
            head: input.head.clone(),
            head_mean,
            rows,
        })
    }

    /// Export comparison rows as CSV for the spreadsheet download.
    pub fn export_to_csv(comparisons: &[Comparison]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for comparison in comparisons {
            wtr.serialize(comparison).map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::InternalError(anyhow::anyhow!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TrialRecord;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_records() -> Vec<TrialRecord> {
        vec![
            TrialRecord::new("FARM1_CITYX", "NEO 760 CE", Some(dec("60.0"))),
            TrialRecord::new("FARM1_CITYX", "LAT 1330 CE", Some(dec("55.0"))),
            TrialRecord::new("FARM2_CITYY", "NEO 760 CE", Some(dec("58.0"))),
            TrialRecord::new("FARM2_CITYY", "LAT 1330 CE", Some(dec("59.5"))),
        ]
    }

    async fn loaded_session(store: &Arc<SessionStore>) -> Uuid {
        let status = store.create().await.unwrap();
        store
            .load_records(status.id, sample_records())
            .await
            .unwrap();
        status.id
    }

    fn service(store: Arc<SessionStore>) -> HeadToHeadService {
        HeadToHeadService::new(store, ToleranceBand::default(), RoundingPolicy::default())
    }

    #[tokio::test]
    async fn run_builds_and_reuses_cache() {
        let store = Arc::new(SessionStore::new(4));
        let session_id = loaded_session(&store).await;
        let service = service(Arc::clone(&store));

        let first = service
            .run(session_id, ToleranceBand::default())
            .await
            .unwrap();
        assert!(!first.reused_cache);
        assert_eq!(first.comparison_count, 4);

        let second = service
            .run(session_id, ToleranceBand::default())
            .await
            .unwrap();
        assert!(second.reused_cache);
        assert_eq!(second.built_at, first.built_at);
    }

    #[tokio::test]
    async fn changing_band_rebuilds() {
        let store = Arc::new(SessionStore::new(4));
        let session_id = loaded_session(&store).await;
        let service = service(Arc::clone(&store));

        service
            .run(session_id, ToleranceBand::default())
            .await
            .unwrap();
        let rerun = service
            .run(session_id, ToleranceBand::strict())
            .await
            .unwrap();
        assert!(!rerun.reused_cache);
    }

    #[tokio::test]
    async fn run_without_records_is_not_found() {
        let store = Arc::new(SessionStore::new(4));
        let status = store.create().await.unwrap();
        let service = service(Arc::clone(&store));

        assert!(matches!(
            service.run(status.id, ToleranceBand::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn group_summary_keeps_check_order() {
        let store = Arc::new(SessionStore::new(4));
        let session_id = loaded_session(&store).await;
        let service = service(Arc::clone(&store));
        service
            .run(session_id, ToleranceBand::default())
            .await
            .unwrap();

        let view = service
            .group_summary(
                session_id,
                &GroupSummaryInput {
                    head: "NEO 760 CE".to_string(),
                    checks: vec!["LAT 1330 CE".to_string()],
                },
            )
            .await
            .unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].pair.check, "LAT 1330 CE");
        assert!(view.head_mean.is_some());
    }

    #[test]
    fn resolve_band_rejects_inverted_overrides() {
        let store = Arc::new(SessionStore::new(4));
        let service = service(store);
        let input = RunComparisonsInput {
            tolerance_lo: Some(dec("2.0")),
            tolerance_hi: Some(dec("-2.0")),
        };
        assert!(service.resolve_band(&input).is_err());
    }

    #[test]
    fn csv_export_includes_outcomes() {
        let records = sample_records();
        let comparisons = build_comparisons(
            &records,
            ToleranceBand::default(),
            RoundingPolicy::default(),
        )
        .unwrap();
        let csv_data = HeadToHeadService::export_to_csv(&comparisons).unwrap();
        assert!(csv_data.contains("site_id"));
        assert!(csv_data.contains("win"));
    }
}
