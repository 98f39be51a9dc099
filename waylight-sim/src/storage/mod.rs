pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use waylight_core::{BatteryHistoryRecord, BatteryStateRecord, EventRecord, MeshStatusRecord};

/// Storage abstraction for simulation records.
///
/// Appends must be durable before a tick is considered complete. A crash
/// may duplicate the last record but never lose a prior one.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Error type specific to this storage implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Overwrite the single battery-state record.
    async fn save_battery_state(&self, record: BatteryStateRecord) -> Result<(), Self::Error>;

    /// Load the battery-state record. `Ok(None)` means no prior state
    /// exists (cold start); a malformed record is an error.
    async fn load_battery_state(&self) -> Result<Option<BatteryStateRecord>, Self::Error>;

    /// Append one battery-history entry.
    async fn append_battery_history(
        &self,
        record: BatteryHistoryRecord,
    ) -> Result<(), Self::Error>;

    /// Fetch the full battery history in append order.
    async fn load_battery_history(&self) -> Result<Vec<BatteryHistoryRecord>, Self::Error>;

    /// Append one event-log entry.
    async fn append_event(&self, record: EventRecord) -> Result<(), Self::Error>;

    /// Fetch the full event log in append order.
    async fn load_event_log(&self) -> Result<Vec<EventRecord>, Self::Error>;

    /// Append one mesh-status snapshot.
    async fn append_mesh_status(&self, record: MeshStatusRecord) -> Result<(), Self::Error>;

    /// Fetch the full mesh-status history in append order.
    async fn load_mesh_status_history(&self) -> Result<Vec<MeshStatusRecord>, Self::Error>;
}
