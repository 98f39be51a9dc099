use std::collections::BTreeMap;

use jiff::Timestamp;
use tempfile::NamedTempFile;
use ulid::Ulid;

use waylight_core::{
    BatteryHistoryRecord, BatteryStateRecord, EventId, EventRecord, MeshPowerMode,
    MeshStatusRecord, NodeId, NodeState, NodeStatus,
};
use waylight_sim::storage::memory::{MemoryStore, MemoryStoreError};
use waylight_sim::storage::sqlite::{SqliteStore, SqliteStoreError};
use waylight_sim::storage::RecordStore;

fn dummy_history(charge_pct: f64) -> BatteryHistoryRecord {
    BatteryHistoryRecord {
        timestamp: Timestamp::now(),
        voltage: 3.0 + 1.2 * charge_pct / 100.0,
        current_a: 0.2,
        charge_pct,
    }
}

fn dummy_event(event: &str) -> EventRecord {
    EventRecord {
        id: EventId(Ulid::new()),
        timestamp: Timestamp::now(),
        event: event.into(),
    }
}

fn dummy_mesh_status() -> MeshStatusRecord {
    let mut nodes = BTreeMap::new();
    nodes.insert(
        NodeId::from("A"),
        NodeStatus {
            state: NodeState::Up,
            power_mode: MeshPowerMode::Normal,
            bandwidth_kbps: 100.0,
        },
    );
    nodes.insert(
        NodeId::from("B"),
        NodeStatus {
            state: NodeState::Down,
            power_mode: MeshPowerMode::Critical,
            bandwidth_kbps: 10.0,
        },
    );
    MeshStatusRecord {
        timestamp: Timestamp::now(),
        nodes,
    }
}

// memory storage tests

#[tokio::test]
async fn memory_battery_state_cold_start() -> Result<(), MemoryStoreError> {
    let store = MemoryStore::default();
    assert!(store.load_battery_state().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn memory_battery_state_overwrite() -> Result<(), MemoryStoreError> {
    let store = MemoryStore::default();

    store
        .save_battery_state(BatteryStateRecord { charge_ah: 2.5 })
        .await?;
    store
        .save_battery_state(BatteryStateRecord { charge_ah: 3.0 })
        .await?;

    let state = store.load_battery_state().await?;
    assert_eq!(state.map(|r| r.charge_ah), Some(3.0));
    Ok(())
}

#[tokio::test]
async fn memory_appends_preserve_order() -> Result<(), MemoryStoreError> {
    let store = MemoryStore::default();

    store.append_battery_history(dummy_history(60.0)).await?;
    store.append_battery_history(dummy_history(55.0)).await?;
    store.append_event(dummy_event("first")).await?;
    store.append_event(dummy_event("second")).await?;
    store.append_mesh_status(dummy_mesh_status()).await?;

    let history = store.load_battery_history().await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].charge_pct, 60.0);
    assert_eq!(history[1].charge_pct, 55.0);

    let events = store.load_event_log().await?;
    assert_eq!(events.len(), 2);
    assert_eq!(&*events[0].event, "first");
    assert_eq!(&*events[1].event, "second");

    let statuses = store.load_mesh_status_history().await?;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].nodes.len(), 2);
    Ok(())
}

// SQLite storage tests

#[tokio::test]
async fn sqlite_battery_state_cold_start() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteStore::new(temp_file.path()).await?;

    assert!(store.load_battery_state().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn sqlite_battery_state_overwrite() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteStore::new(temp_file.path()).await?;

    store
        .save_battery_state(BatteryStateRecord { charge_ah: 2.5 })
        .await?;
    store
        .save_battery_state(BatteryStateRecord { charge_ah: 4.0 })
        .await?;

    let state = store.load_battery_state().await?;
    assert_eq!(state.map(|r| r.charge_ah), Some(4.0));
    Ok(())
}

#[tokio::test]
async fn sqlite_appends_preserve_order() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteStore::new(temp_file.path()).await?;

    store.append_battery_history(dummy_history(60.0)).await?;
    store.append_battery_history(dummy_history(55.0)).await?;
    store.append_event(dummy_event("first")).await?;
    store.append_event(dummy_event("second")).await?;
    store.append_mesh_status(dummy_mesh_status()).await?;

    let history = store.load_battery_history().await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].charge_pct, 60.0);
    assert_eq!(history[1].charge_pct, 55.0);

    let events = store.load_event_log().await?;
    assert_eq!(events.len(), 2);
    assert_eq!(&*events[0].event, "first");
    assert_eq!(&*events[1].event, "second");

    let statuses = store.load_mesh_status_history().await?;
    assert_eq!(statuses.len(), 1);
    assert_eq!(
        statuses[0].nodes.get(&NodeId::from("B")).map(|s| s.state),
        Some(NodeState::Down)
    );
    Ok(())
}

#[tokio::test]
async fn sqlite_persists_across_instances() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path();

    {
        let store = SqliteStore::new(db_path).await?;
        store
            .save_battery_state(BatteryStateRecord { charge_ah: 1.5 })
            .await?;
        store.append_battery_history(dummy_history(30.0)).await?;
    }

    {
        let store = SqliteStore::new(db_path).await?;
        let state = store.load_battery_state().await?;
        assert_eq!(state.map(|r| r.charge_ah), Some(1.5));
        assert_eq!(store.load_battery_history().await?.len(), 1);
    }

    Ok(())
}

#[tokio::test]
async fn sqlite_rejects_malformed_battery_state() {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path();

    {
        let store = SqliteStore::new(db_path).await.unwrap();
        store
            .save_battery_state(BatteryStateRecord { charge_ah: 1.0 })
            .await
            .unwrap();
    }

    // Corrupt the stored row out of band.
    {
        let conn = rusqlite::Connection::open(db_path).unwrap();
        conn.execute(
            "UPDATE battery_state SET record_json = 'not json' WHERE id = 1",
            [],
        )
        .unwrap();
    }

    let store = SqliteStore::new(db_path).await.unwrap();
    let result = store.load_battery_state().await;
    assert!(matches!(result, Err(SqliteStoreError::MalformedRecord(_))));
}
