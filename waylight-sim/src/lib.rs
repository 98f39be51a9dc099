pub mod alert;
pub mod analytics;
pub mod config;
pub mod driver;
pub mod energy;
pub mod monitor;
pub mod storage;
pub mod telemetry;

pub use alert::{AlertTransport, LogAlert, MemoryAlert};
pub use config::{
    AlertConfig, AlertTransportConfig, Config, LinkConfig, MeshConfig, SimulationConfig,
    StorageConfig, TelemetryConfig,
};
pub use driver::run_simulation;
pub use monitor::{HealthMonitor, UserServiceProbe};
pub use storage::memory::MemoryStore;
pub use storage::sqlite::SqliteStore;
pub use storage::RecordStore;
pub use telemetry::TelemetrySnapshot;
