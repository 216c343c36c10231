//! Durable, insertion-ordered application records.
//!
//! The whole collection lives under one backend key and every mutation is a
//! read-modify-write of that value. Mutations through one store instance are
//! serialised; writers in other processes are not coordinated and the later
//! write wins.
//!
//! The persisted order is insertion order. Display order (newest
//! application date first) is always computed on a copy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::store::{
    KeyValueBackend, KeyValueExt, APPLICATIONS_KEY, LAST_APPLICATION_ID_KEY,
};
use crate::types::application::{ApplicationId, ApplicationRecord, NewApplication};

/// Application records on top of a key-value backend.
pub struct ApplicationStore<B: ?Sized, C = SystemClock> {
    backend: Arc<B>,
    clock: C,
    mutation: Mutex<()>,
}

impl<B: KeyValueBackend + ?Sized> ApplicationStore<B, SystemClock> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: KeyValueBackend + ?Sized, C: Clock> ApplicationStore<B, C> {
    pub fn with_clock(backend: Arc<B>, clock: C) -> Self {
        Self {
            backend,
            clock,
            mutation: Mutex::new(()),
        }
    }

    /// Write an empty collection if none exists yet.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.mutation.lock().await;
        if self.backend.get(APPLICATIONS_KEY).await?.is_none() {
            self.backend
                .save(APPLICATIONS_KEY, &Vec::<ApplicationRecord>::new())
                .await?;
            info!("Initialized empty application store");
        }
        Ok(())
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Result<Vec<ApplicationRecord>> {
        Ok(self
            .backend
            .load::<Vec<ApplicationRecord>>(APPLICATIONS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// All records, newest application date first.
    pub async fn list_for_display(&self) -> Result<Vec<ApplicationRecord>> {
        Ok(display_order(&self.list().await?))
    }

    pub async fn get(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    /// Append a record whose id the caller generated.
    pub async fn add(&self, record: ApplicationRecord) -> Result<()> {
        let _guard = self.mutation.lock().await;
        let mut records = self.list().await?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(TrackerError::DuplicateId(record.id));
        }

        info!(id = %record.id, company = %record.company_name, "Application added");
        let id = record.id;
        records.push(record);
        self.backend.save(APPLICATIONS_KEY, &records).await?;
        self.raise_high_water(id).await
    }

    /// Assign a fresh id and append.
    pub async fn create(&self, new: NewApplication) -> Result<ApplicationRecord> {
        let _guard = self.mutation.lock().await;
        let mut records = self.list().await?;
        let high_water = self.high_water().await?;
        let record = new.into_record(next_id(&records, high_water, self.clock.now()));

        info!(id = %record.id, company = %record.company_name, "Application created");
        records.push(record.clone());
        self.backend.save(APPLICATIONS_KEY, &records).await?;
        self.raise_high_water(record.id).await?;
        Ok(record)
    }

    /// Remove the record with `id`. Returns whether one was removed;
    /// an unknown id is a no-op.
    pub async fn delete_by_id(&self, id: ApplicationId) -> Result<bool> {
        let _guard = self.mutation.lock().await;
        let mut records = self.list().await?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            debug!(id = %id, "Delete of unknown application ignored");
            return Ok(false);
        }

        self.backend.save(APPLICATIONS_KEY, &records).await?;
        info!(id = %id, "Application deleted");
        Ok(true)
    }

    async fn high_water(&self) -> Result<Option<ApplicationId>> {
        self.backend.load(LAST_APPLICATION_ID_KEY).await
    }

    /// Caller holds the mutation lock.
    async fn raise_high_water(&self, id: ApplicationId) -> Result<()> {
        if self.high_water().await?.is_some_and(|last| last >= id) {
            return Ok(());
        }
        self.backend.save(LAST_APPLICATION_ID_KEY, &id).await
    }
}

/// Sorted copy for display: application date descending, ties in
/// insertion order.
pub fn display_order(records: &[ApplicationRecord]) -> Vec<ApplicationRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.application_date.cmp(&a.application_date));
    sorted
}

/// Next id: the current epoch millisecond, bumped past every existing id and
/// past the highest id ever assigned. Ids stay unique and increasing under
/// rapid creation and are not reused after the newest record is deleted.
pub fn next_id(
    existing: &[ApplicationRecord],
    high_water: Option<ApplicationId>,
    now: DateTime<Utc>,
) -> ApplicationId {
    let now_millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let after_existing = existing
        .iter()
        .map(|r| r.id)
        .chain(high_water)
        .map(|id| id.as_u64().saturating_add(1))
        .max()
        .unwrap_or(0);
    ApplicationId(now_millis.max(after_existing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryBackend;
    use crate::testing::MockClock;
    use crate::types::application::ApplicationStatus;
    use chrono::{NaiveDate, TimeZone};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(id: u64, company: &str, day: &str) -> ApplicationRecord {
        NewApplication::new(company, date(day)).into_record(ApplicationId(id))
    }

    fn store() -> ApplicationStore<MemoryBackend, Arc<MockClock>> {
        ApplicationStore::with_clock(
            Arc::new(MemoryBackend::new()),
            Arc::new(MockClock::at_millis(1_704_412_800_000)),
        )
    }

    #[tokio::test]
    async fn test_add_then_list_then_delete() {
        let store = store();
        let r = record(1, "Acme", "2024-01-05");

        store.add(r.clone()).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![r.clone()]);

        assert!(store.delete_by_id(r.id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = store();
        store.add(record(7, "Acme", "2024-01-05")).await.unwrap();

        let err = store.add(record(7, "Globex", "2024-01-06")).await.unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateId(ApplicationId(7))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_noop() {
        let store = store();
        store.add(record(1, "Acme", "2024-01-05")).await.unwrap();

        assert!(!store.delete_by_id(ApplicationId(99)).await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_after_display_sort() {
        let store = store();
        store.add(record(1, "Old", "2023-06-01")).await.unwrap();
        store.add(record(2, "New", "2024-03-01")).await.unwrap();
        store.add(record(3, "Mid", "2023-12-01")).await.unwrap();

        for _ in 0..3 {
            let display: Vec<_> = store
                .list_for_display()
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.company_name)
                .collect();
            assert_eq!(display, ["New", "Mid", "Old"]);
        }

        let stored: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.as_u64())
            .collect();
        assert_eq!(stored, [1, 2, 3]);
    }

    #[test]
    fn test_display_order_ties_keep_insertion_order() {
        let records = vec![
            record(1, "First", "2024-01-05"),
            record(2, "Earlier", "2024-01-01"),
            record(3, "Second", "2024-01-05"),
        ];

        let names: Vec<_> = display_order(&records)
            .into_iter()
            .map(|r| r.company_name)
            .collect();
        assert_eq!(names, ["First", "Second", "Earlier"]);
        assert_eq!(records[0].company_name, "First");
        assert_eq!(records[1].company_name, "Earlier");
    }

    #[tokio::test]
    async fn test_create_generates_unique_increasing_ids() {
        let store = store();
        let mut ids = Vec::new();
        for i in 0..20 {
            let created = store
                .create(NewApplication::new(format!("Company {i}"), date("2024-01-05")))
                .await
                .unwrap();
            ids.push(created.id);
        }

        assert_eq!(ids[0], ApplicationId(1_704_412_800_000));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_next_id_uses_clock_when_ahead() {
        let now = Utc.timestamp_millis_opt(5_000).unwrap();
        assert_eq!(next_id(&[record(10, "A", "2024-01-01")], None, now), ApplicationId(5_000));
        assert_eq!(
            next_id(&[record(9_000, "A", "2024-01-01")], None, now),
            ApplicationId(9_001)
        );
        assert_eq!(next_id(&[], None, now), ApplicationId(5_000));
        assert_eq!(next_id(&[], Some(ApplicationId(7_000)), now), ApplicationId(7_001));
    }

    #[tokio::test]
    async fn test_deleted_newest_id_is_not_reused() {
        let store = store();
        let new = || NewApplication::new("Acme", date("2024-01-05"));

        let first = store.create(new()).await.unwrap();
        let second = store.create(new()).await.unwrap();
        assert!(store.delete_by_id(second.id).await.unwrap());

        let third = store.create(new()).await.unwrap();
        assert_ne!(third.id, second.id);
        assert!(third.id > second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_added_ids_raise_the_high_water_mark() {
        let store = store();
        let far_ahead = ApplicationId(1_704_412_800_000 + 50);
        store.add(record(far_ahead.as_u64(), "Acme", "2024-01-05")).await.unwrap();
        assert!(store.delete_by_id(far_ahead).await.unwrap());

        let created = store
            .create(NewApplication::new("Globex", date("2024-01-06")))
            .await
            .unwrap();
        assert_eq!(created.id, ApplicationId(far_ahead.as_u64() + 1));
    }

    #[tokio::test]
    async fn test_initialize_only_when_absent() {
        let store = store();
        store.initialize().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        store.add(record(1, "Acme", "2024-01-05")).await.unwrap();
        store.initialize().await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_status_survives_round_trip() {
        let store = store();
        let r = NewApplication::new("Acme", date("2024-01-05"))
            .with_status(ApplicationStatus::new("ghosted"))
            .into_record(ApplicationId(1));
        store.add(r).await.unwrap();

        let loaded = store.get(ApplicationId(1)).await.unwrap().unwrap();
        assert_eq!(loaded.status.as_str(), "ghosted");
    }
}
