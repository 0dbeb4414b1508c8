// History store - Capacity-bounded, per-kind log of past assessments
use crate::application::key_value_store::KeyValueStore;
use crate::domain::error::{AssessmentError, AssessmentResult};
use crate::domain::history::{HistoryKind, HistoryRecord};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Records kept per kind before the oldest insertion is evicted.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Two independent most-recent-first logs, one per [`HistoryKind`].
///
/// Each kind is persisted as a single JSON array under [`HistoryKind::storage_key`] and is
/// rewritten in full on every mutation. Read-modify-write sequences are serialised per kind so
/// concurrent callers never lose an update; the two kinds never contend.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    performance_lock: Mutex<()>,
    degradation_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::build(store, DEFAULT_HISTORY_CAPACITY)
    }

    /// A store keeping at most `capacity` records per kind. A capacity of zero is rejected.
    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> AssessmentResult<Self> {
        if capacity == 0 {
            return Err(AssessmentError::invalid("capacity", "must be at least 1"));
        }
        Ok(Self::build(store, capacity))
    }

    fn build(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity,
            performance_lock: Mutex::new(()),
            degradation_lock: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_for(&self, kind: HistoryKind) -> &Mutex<()> {
        match kind {
            HistoryKind::Performance => &self.performance_lock,
            HistoryKind::Degradation => &self.degradation_lock,
        }
    }

    /// Insert at the front of the record's log, evicting from the tail beyond capacity.
    pub async fn append(&self, record: HistoryRecord) -> AssessmentResult<()> {
        let kind = record.kind();
        if !record.is_finite() {
            return Err(AssessmentError::invalid(
                "record",
                "non-finite values cannot be persisted",
            ));
        }
        let _guard = self.lock_for(kind).lock().await;

        let mut log = self.read_log(kind).await?;
        let id = record.id;
        log.insert(0, record);

        if log.len() > self.capacity {
            let evicted = log.split_off(self.capacity);
            tracing::debug!(
                "Evicted {} oldest {} record(s) at capacity {}",
                evicted.len(),
                kind,
                self.capacity
            );
        }

        self.write_log(kind, &log).await?;
        tracing::debug!("Appended {} record {} ({} stored)", kind, id, log.len());
        Ok(())
    }

    /// All records of a kind, most recently inserted first.
    pub async fn list(&self, kind: HistoryKind) -> AssessmentResult<Vec<HistoryRecord>> {
        let _guard = self.lock_for(kind).lock().await;
        self.read_log(kind).await
    }

    /// Both logs merged, newest creation time first.
    pub async fn list_all(&self) -> AssessmentResult<Vec<HistoryRecord>> {
        let mut all = Vec::new();
        for kind in HistoryKind::ALL {
            all.extend(self.list(kind).await?);
        }
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    /// First record with `id`, i.e. the most recently inserted one on a collision.
    pub async fn get(&self, id: i64, kind: HistoryKind) -> AssessmentResult<HistoryRecord> {
        self.list(kind)
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(AssessmentError::NotFound { id, kind })
    }

    /// Remove the first record with `id` and return it.
    ///
    /// When several records share an id only the first match goes. A miss leaves the log
    /// untouched (nothing is rewritten) and reports `NotFound`.
    pub async fn remove(&self, id: i64, kind: HistoryKind) -> AssessmentResult<HistoryRecord> {
        let _guard = self.lock_for(kind).lock().await;

        let mut log = self.read_log(kind).await?;
        let Some(position) = log.iter().position(|record| record.id == id) else {
            tracing::warn!("No {} record with id {} to remove", kind, id);
            return Err(AssessmentError::NotFound { id, kind });
        };

        let removed = log.remove(position);
        self.write_log(kind, &log).await?;
        tracing::debug!("Removed {} record {}", kind, id);
        Ok(removed)
    }

    /// Drop every record of a kind.
    pub async fn clear(&self, kind: HistoryKind) -> AssessmentResult<()> {
        let _guard = self.lock_for(kind).lock().await;
        self.store
            .delete(kind.storage_key())
            .await
            .with_context(|| format!("Failed to clear {} history", kind))?;
        tracing::info!("Cleared {} history", kind);
        Ok(())
    }

    async fn read_log(&self, kind: HistoryKind) -> AssessmentResult<Vec<HistoryRecord>> {
        let key = kind.storage_key();
        let Some(bytes) = self
            .store
            .get(key)
            .await
            .with_context(|| format!("Failed to read {}", key))?
        else {
            return Ok(Vec::new());
        };

        let log: Vec<HistoryRecord> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse persisted history under {}", key))?;
        Ok(log)
    }

    async fn write_log(&self, kind: HistoryKind, log: &[HistoryRecord]) -> AssessmentResult<()> {
        let key = kind.storage_key();
        let bytes = serde_json::to_vec(log).with_context(|| format!("Failed to serialize {}", key))?;
        self.store
            .put(key, bytes)
            .await
            .with_context(|| format!("Failed to write {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::degradation::{DegradationPattern, DegradationSample, PatternResult};
    use crate::domain::history::Assessment;
    use crate::domain::measurement::{Measurement, PerformanceResult, RiskLevel};
    use crate::infrastructure::memory_store::InMemoryKeyValueStore;
    use chrono::{Duration, TimeZone, Utc};

    fn performance_record(id: i64) -> HistoryRecord {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(id);
        HistoryRecord {
            id,
            created_at,
            assessment: Assessment::Performance {
                inputs: Measurement {
                    current: 10.0 + id as f64,
                    temperature: 40.0,
                },
                result: PerformanceResult {
                    delta_i: 0.5,
                    delta_t: 0.57,
                    sensitivity: 1.14,
                    i_critic: 45.83,
                    risk_i: RiskLevel::L1,
                    risk_t: RiskLevel::L2,
                    risk_r: RiskLevel::L3,
                },
            },
        }
    }

    fn degradation_record(id: i64) -> HistoryRecord {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(id);
        HistoryRecord {
            id,
            created_at,
            assessment: Assessment::Degradation {
                inputs: vec![DegradationSample::parse("2020-01", "0.5").unwrap()],
                result: PatternResult {
                    pattern: DegradationPattern::Critical,
                    stage: DegradationPattern::Critical.stage().to_string(),
                    management: DegradationPattern::Critical.management().to_string(),
                    characteristics: "test".to_string(),
                    decrease_rate: 0.0,
                    volatility: 0.0,
                    below_threshold: true,
                    first_value: 0.5,
                    last_value: 0.5,
                    min_value: 0.5,
                    max_value: 0.5,
                    temporary_drops: 0,
                },
            },
        }
    }

    fn new_store() -> (Arc<InMemoryKeyValueStore>, HistoryStore) {
        let backend = Arc::new(InMemoryKeyValueStore::new());
        let store = HistoryStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_append_is_most_recent_first() {
        let (_, store) = new_store();
        let first = performance_record(1);
        let second = performance_record(2);

        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let log = store.list(HistoryKind::Performance).await.unwrap();
        assert_eq!(log, vec![second, first]);
    }

    #[tokio::test]
    async fn test_round_trip_head() {
        let (_, store) = new_store();
        let record = degradation_record(7);
        store.append(record.clone()).await.unwrap();
        assert_eq!(store.list(HistoryKind::Degradation).await.unwrap()[0], record);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_insertion() {
        let (_, store) = new_store();
        for id in 0..=100 {
            store.append(performance_record(id)).await.unwrap();
        }

        let log = store.list(HistoryKind::Performance).await.unwrap();
        assert_eq!(log.len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(log[0].id, 100);
        assert!(log.iter().all(|r| r.id != 0));
    }

    #[tokio::test]
    async fn test_eviction_follows_insertion_not_timestamp() {
        let small = HistoryStore::with_capacity(Arc::new(InMemoryKeyValueStore::new()), 2).unwrap();

        // Inserted first but carries the newest timestamp
        small.append(performance_record(900)).await.unwrap();
        small.append(performance_record(1)).await.unwrap();
        small.append(performance_record(2)).await.unwrap();

        let ids: Vec<i64> = small
            .list(HistoryKind::Performance)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            HistoryStore::with_capacity(Arc::new(InMemoryKeyValueStore::new()), 0),
            Err(AssessmentError::InvalidInput { field: "capacity", .. })
        ));
    }

    #[tokio::test]
    async fn test_non_finite_record_leaves_log_readable() {
        let (_, store) = new_store();
        let kept = performance_record(1);
        store.append(kept.clone()).await.unwrap();

        let mut overflowed = performance_record(2);
        if let Assessment::Performance { result, .. } = &mut overflowed.assessment {
            result.sensitivity = f64::INFINITY;
        }
        assert!(matches!(
            store.append(overflowed).await,
            Err(AssessmentError::InvalidInput { field: "record", .. })
        ));
        assert_eq!(store.list(HistoryKind::Performance).await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let (_, store) = new_store();
        store.append(performance_record(1)).await.unwrap();
        store.append(degradation_record(1)).await.unwrap();

        store.clear(HistoryKind::Performance).await.unwrap();

        assert!(store.list(HistoryKind::Performance).await.unwrap().is_empty());
        assert_eq!(store.list(HistoryKind::Degradation).await.unwrap().len(), 1);

        store.remove(1, HistoryKind::Degradation).await.unwrap();
        assert!(store.list(HistoryKind::Degradation).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_not_found() {
        let (_, store) = new_store();
        store.append(performance_record(1)).await.unwrap();
        store.append(performance_record(2)).await.unwrap();
        let before = store.list(HistoryKind::Performance).await.unwrap();

        let err = store.remove(99, HistoryKind::Performance).await.unwrap_err();
        assert!(matches!(err, AssessmentError::NotFound { id: 99, kind: HistoryKind::Performance }));
        assert_eq!(store.list(HistoryKind::Performance).await.unwrap(), before);

        // Right id, wrong kind
        assert!(store.remove(1, HistoryKind::Degradation).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_duplicate_id_removes_first_match_only() {
        let (_, store) = new_store();
        let mut older = performance_record(5);
        older.assessment = performance_record(6).assessment;
        store.append(older.clone()).await.unwrap();
        let newer = performance_record(5);
        store.append(newer.clone()).await.unwrap();

        let removed = store.remove(5, HistoryKind::Performance).await.unwrap();
        assert_eq!(removed, newer);
        assert_eq!(store.list(HistoryKind::Performance).await.unwrap(), vec![older]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_, store) = new_store();
        store.append(degradation_record(3)).await.unwrap();

        assert_eq!(store.get(3, HistoryKind::Degradation).await.unwrap().id, 3);
        assert!(matches!(
            store.get(4, HistoryKind::Degradation).await,
            Err(AssessmentError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_all_merges_by_creation_time() {
        let (_, store) = new_store();
        store.append(performance_record(10)).await.unwrap();
        store.append(degradation_record(20)).await.unwrap();
        store.append(performance_record(5)).await.unwrap();

        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![20, 10, 5]);
    }

    #[tokio::test]
    async fn test_persists_under_kind_key() {
        let (backend, store) = new_store();
        store.append(performance_record(1)).await.unwrap();

        let bytes = backend
            .get("insulation_performance_history")
            .await
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["kind"], "performance");
        assert!(backend.get("insulation_degradation_history").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_log_is_storage_error() {
        let (backend, store) = new_store();
        backend
            .put("insulation_degradation_history", b"not json".to_vec())
            .await
            .unwrap();

        assert!(matches!(
            store.list(HistoryKind::Degradation).await,
            Err(AssessmentError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(HistoryStore::new(Arc::new(InMemoryKeyValueStore::new())));
        let mut handles = Vec::new();
        for id in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(performance_record(id)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list(HistoryKind::Performance).await.unwrap().len(), 20);
    }
}
