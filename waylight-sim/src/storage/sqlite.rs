use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::Mutex;

use waylight_core::{BatteryHistoryRecord, BatteryStateRecord, EventRecord, MeshStatusRecord};

use crate::storage::RecordStore;

/// SQLite-backed storage implementation.
/// Append-only tables store records as JSON blobs; the battery state lives
/// in a single overwritten row.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

/// Error type for SqliteStore.
#[derive(Debug, thiserror::Error)]
pub enum SqliteStoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("schema creation failed: {0}")]
    SchemaCreationFailed(String),
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),
}

impl SqliteStore {
    /// Opens or creates a SQLite database at the given path.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, SqliteStoreError> {
        let conn = Connection::open(path)
            .map_err(|e| SqliteStoreError::ConnectionFailed(format!("failed to open DB: {e}")))?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), SqliteStoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS battery_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                record_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS battery_history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                record_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS event_log (
                id TEXT PRIMARY KEY,
                record_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS mesh_status_history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                record_json TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| {
            SqliteStoreError::SchemaCreationFailed(format!("failed to create tables: {e}"))
        })?;

        Ok(())
    }

    fn load_rows<T: serde::de::DeserializeOwned>(
        conn: &Connection,
        query: &str,
    ) -> Result<Vec<T>, SqliteStoreError> {
        let mut stmt = conn.prepare(query)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            let json = row?;
            let record = serde_json::from_str(&json)
                .map_err(|e| SqliteStoreError::MalformedRecord(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    type Error = SqliteStoreError;

    async fn save_battery_state(&self, record: BatteryStateRecord) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&record)?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO battery_state (id, record_json) VALUES (1, ?)",
            params![json],
        )?;
        Ok(())
    }

    async fn load_battery_state(&self) -> Result<Option<BatteryStateRecord>, Self::Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT record_json FROM battery_state WHERE id = 1")?;
        let mut rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        match rows.next() {
            Some(row) => {
                let json = row?;
                let record = serde_json::from_str(&json)
                    .map_err(|e| SqliteStoreError::MalformedRecord(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn append_battery_history(
        &self,
        record: BatteryHistoryRecord,
    ) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&record)?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO battery_history (record_json) VALUES (?)",
            params![json],
        )?;
        Ok(())
    }

    async fn load_battery_history(&self) -> Result<Vec<BatteryHistoryRecord>, Self::Error> {
        let conn = self.conn.lock().await;
        Self::load_rows(
            &conn,
            "SELECT record_json FROM battery_history ORDER BY seq",
        )
    }

    async fn append_event(&self, record: EventRecord) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&record)?;
        let id_str = record.id.0.to_string();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO event_log (id, record_json) VALUES (?, ?)",
            params![id_str, json],
        )?;
        Ok(())
    }

    async fn load_event_log(&self) -> Result<Vec<EventRecord>, Self::Error> {
        let conn = self.conn.lock().await;
        Self::load_rows(&conn, "SELECT record_json FROM event_log ORDER BY rowid")
    }

    async fn append_mesh_status(&self, record: MeshStatusRecord) -> Result<(), Self::Error> {
        let json = serde_json::to_string(&record)?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO mesh_status_history (record_json) VALUES (?)",
            params![json],
        )?;
        Ok(())
    }

    async fn load_mesh_status_history(&self) -> Result<Vec<MeshStatusRecord>, Self::Error> {
        let conn = self.conn.lock().await;
        Self::load_rows(
            &conn,
            "SELECT record_json FROM mesh_status_history ORDER BY seq",
        )
    }
}
