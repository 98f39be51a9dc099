use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use waylight_core::{BatteryHistoryRecord, BatteryStateRecord, EventRecord, MeshStatusRecord};

use crate::storage::RecordStore;

/// In-memory storage implementation.
/// This is primarily intended for testing and as a reference
/// implementation of the RecordStore trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    battery_state: Option<BatteryStateRecord>,
    battery_history: Vec<BatteryHistoryRecord>,
    event_log: Vec<EventRecord>,
    mesh_status_history: Vec<MeshStatusRecord>,
}

/// Error type for MemoryStore.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("mutex poisoned: {0}")]
    MutexPoisoned(String),
}

impl<T> From<PoisonError<T>> for MemoryStoreError {
    fn from(err: PoisonError<T>) -> Self {
        MemoryStoreError::MutexPoisoned(err.to_string())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn save_battery_state(&self, record: BatteryStateRecord) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock()?;
        inner.battery_state = Some(record);
        Ok(())
    }

    async fn load_battery_state(&self) -> Result<Option<BatteryStateRecord>, Self::Error> {
        let inner = self.inner.lock()?;
        Ok(inner.battery_state)
    }

    async fn append_battery_history(
        &self,
        record: BatteryHistoryRecord,
    ) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock()?;
        inner.battery_history.push(record);
        Ok(())
    }

    async fn load_battery_history(&self) -> Result<Vec<BatteryHistoryRecord>, Self::Error> {
        let inner = self.inner.lock()?;
        Ok(inner.battery_history.clone())
    }

    async fn append_event(&self, record: EventRecord) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock()?;
        inner.event_log.push(record);
        Ok(())
    }

    async fn load_event_log(&self) -> Result<Vec<EventRecord>, Self::Error> {
        let inner = self.inner.lock()?;
        Ok(inner.event_log.clone())
    }

    async fn append_mesh_status(&self, record: MeshStatusRecord) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock()?;
        inner.mesh_status_history.push(record);
        Ok(())
    }

    async fn load_mesh_status_history(&self) -> Result<Vec<MeshStatusRecord>, Self::Error> {
        let inner = self.inner.lock()?;
        Ok(inner.mesh_status_history.clone())
    }
}
