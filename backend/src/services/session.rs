//! Analysis session store
//!
//! Each dashboard user works inside a session holding an immutable record
//! snapshot and the comparison set derived from it. Sessions never share
//! state; derived results live and die with their session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{
    normalize_cultivar_name, validate_record, Comparison, SessionStatus, ToleranceBand,
    TrialRecord,
};

use crate::error::{AppError, AppResult};

/// Comparison set derived from one snapshot under one band.
///
/// The fingerprint ties the cache to the exact input it was built from;
/// replacing the snapshot or changing the band discards it.
#[derive(Debug, Clone)]
pub struct ComparisonCache {
    pub fingerprint: String,
    pub band: ToleranceBand,
    pub comparisons: Arc<Vec<Comparison>>,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug)]
struct AnalysisSession {
    created_at: DateTime<Utc>,
    records: Arc<Vec<TrialRecord>>,
    fingerprint: Option<String>,
    cache: Option<ComparisonCache>,
}

/// In-memory store of per-user analysis sessions
pub struct SessionStore {
    max_sessions: usize,
    sessions: RwLock<HashMap<Uuid, AnalysisSession>>,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            max_sessions,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a new, empty session.
    pub async fn create(&self) -> AppResult<SessionStatus> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            return Err(AppError::SessionLimitReached);
        }

        let id = Uuid::new_v4();
        let session = AnalysisSession {
            created_at: Utc::now(),
            records: Arc::new(Vec::new()),
            fingerprint: None,
            cache: None,
        };
        let status = status_of(id, &session);
        sessions.insert(id, session);

        tracing::info!(session_id = %id, "analysis session created");
        Ok(status)
    }

    /// Current status of a session.
    pub async fn status(&self, id: Uuid) -> AppResult<SessionStatus> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        Ok(status_of(id, session))
    }

    /// Discard a session and everything derived inside it.
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        tracing::info!(session_id = %id, "analysis session discarded");
        Ok(())
    }

    /// Replace the session's record snapshot.
    ///
    /// Cultivar names are normalized on the way in; the previous
    /// comparison cache is always discarded with the snapshot it was
    /// built from.
    pub async fn load_records(
        &self,
        id: Uuid,
        mut records: Vec<TrialRecord>,
    ) -> AppResult<SessionStatus> {
        for record in &mut records {
            validate_record(record).map_err(|message| AppError::Validation {
                field: "records".to_string(),
                message: message.to_string(),
                message_pt: format!("Registro de ensaio inválido: {}", message),
            })?;
            record.cultivar = normalize_cultivar_name(&record.cultivar);
        }
        let fingerprint = dataset_fingerprint(&records)?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;

        session.records = Arc::new(records);
        session.fingerprint = Some(fingerprint);
        session.cache = None;

        tracing::info!(
            session_id = %id,
            record_count = session.records.len(),
            "record snapshot loaded"
        );
        Ok(status_of(id, session))
    }

    /// The session's record snapshot.
    pub async fn records(&self, id: Uuid) -> AppResult<Arc<Vec<TrialRecord>>> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        Ok(Arc::clone(&session.records))
    }

    /// The snapshot fingerprint, if records have been loaded.
    pub async fn fingerprint(&self, id: Uuid) -> AppResult<Option<String>> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        Ok(session.fingerprint.clone())
    }

    /// The cached comparison set, if one has been built.
    pub async fn cache(&self, id: Uuid) -> AppResult<Option<ComparisonCache>> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        Ok(session.cache.clone())
    }

    /// Install a freshly built comparison set.
    pub async fn store_cache(&self, id: Uuid, cache: ComparisonCache) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        session.cache = Some(cache);
        Ok(())
    }

    /// The built comparison set, or a conflict if no run has happened.
    pub async fn comparisons(&self, id: Uuid) -> AppResult<Arc<Vec<Comparison>>> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Analysis session".to_string()))?;
        session
            .cache
            .as_ref()
            .map(|cache| Arc::clone(&cache.comparisons))
            .ok_or(AppError::ComparisonsNotBuilt)
    }
}

fn status_of(id: Uuid, session: &AnalysisSession) -> SessionStatus {
    SessionStatus {
        id,
        created_at: session.created_at,
        record_count: session.records.len() as u64,
        dataset_fingerprint: session.fingerprint.clone(),
        comparisons_built: session.cache.is_some(),
        comparison_count: session
            .cache
            .as_ref()
            .map(|cache| cache.comparisons.len() as u64)
            .unwrap_or(0),
    }
}

/// SHA-256 content hash of a record snapshot, used as the cache key.
pub fn dataset_fingerprint(records: &[TrialRecord]) -> AppResult<String> {
    let bytes =
        serde_json::to_vec(records).map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_records() -> Vec<TrialRecord> {
        vec![
            TrialRecord::new("FARM1_CITYX", "NEO 760 CE", Some(dec("60.0"))),
            TrialRecord::new("FARM1_CITYX", "LAT 1330 CE", Some(dec("55.0"))),
        ]
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let store = SessionStore::new(4);
        let status = store.create().await.unwrap();
        assert_eq!(status.record_count, 0);
        assert!(status.dataset_fingerprint.is_none());
        assert!(!status.comparisons_built);

        let status = store
            .load_records(status.id, sample_records())
            .await
            .unwrap();
        assert_eq!(status.record_count, 2);
        assert!(status.dataset_fingerprint.is_some());

        store.remove(status.id).await.unwrap();
        assert!(matches!(
            store.status(status.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn session_limit_enforced() {
        let store = SessionStore::new(1);
        store.create().await.unwrap();
        assert!(matches!(
            store.create().await,
            Err(AppError::SessionLimitReached)
        ));
    }

    #[tokio::test]
    async fn reloading_records_invalidates_cache() {
        let store = SessionStore::new(4);
        let status = store.create().await.unwrap();
        let status = store
            .load_records(status.id, sample_records())
            .await
            .unwrap();
        let fingerprint = status.dataset_fingerprint.clone().unwrap();

        store
            .store_cache(
                status.id,
                ComparisonCache {
                    fingerprint,
                    band: ToleranceBand::default(),
                    comparisons: Arc::new(Vec::new()),
                    built_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        assert!(store.cache(status.id).await.unwrap().is_some());

        store
            .load_records(status.id, sample_records())
            .await
            .unwrap();
        assert!(store.cache(status.id).await.unwrap().is_none());
        assert!(matches!(
            store.comparisons(status.id).await,
            Err(AppError::ComparisonsNotBuilt)
        ));
    }

    #[tokio::test]
    async fn load_normalizes_cultivar_names() {
        let store = SessionStore::new(4);
        let status = store.create().await.unwrap();
        let records = vec![TrialRecord::new("FARM1_CITYX", "  neo  760 ce ", Some(dec("60.0")))];
        let status = store.load_records(status.id, records).await.unwrap();
        let snapshot = store.records(status.id).await.unwrap();
        assert_eq!(snapshot[0].cultivar, "NEO 760 CE");
    }

    #[tokio::test]
    async fn invalid_record_rejected_at_load() {
        let store = SessionStore::new(4);
        let status = store.create().await.unwrap();
        let records = vec![TrialRecord::new("", "NEO 760 CE", Some(dec("60.0")))];
        assert!(matches!(
            store.load_records(status.id, records).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = dataset_fingerprint(&sample_records()).unwrap();
        let b = dataset_fingerprint(&sample_records()).unwrap();
        assert_eq!(a, b);

        let mut changed = sample_records();
        changed[0].yield_metric = Some(dec("61.0"));
        let c = dataset_fingerprint(&changed).unwrap();
        assert_ne!(a, c);
    }
}
