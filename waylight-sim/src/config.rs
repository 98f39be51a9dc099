use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use waylight_core::{BatteryConfig, LightingConfig, PowerPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub battery: BatteryConfig,
    pub lighting: LightingConfig,
    pub power: PowerPolicy,
    pub mesh: MeshConfig,
    pub storage: StorageConfig,
    pub alert: AlertConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated hours to run.
    pub hours: u32,
    /// IANA timezone the deployment clock runs in.
    pub timezone: String,
    /// Health reported for the external user service; the service itself
    /// is not part of the simulation.
    pub user_service_healthy: bool,
}

/// Initial mesh layout: nodes plus symmetric links.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshConfig {
    pub nodes: Vec<String>,
    pub links: Vec<LinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    pub a: String,
    pub b: String,
    pub quality: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    Memory,
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Upper bound on a single alert delivery attempt.
    pub timeout_secs: u64,
    pub transport: AlertTransportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AlertTransportConfig {
    /// Log alerts without delivering them anywhere.
    Log,
    Smtp {
        relay: String,
        port: u16,
        username: String,
        password: String,
        from: String,
        to: String,
        subject: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Address for the read-only telemetry HTTP server.
    pub http_addr: SocketAddr,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                hours: 24,
                timezone: "UTC".to_string(),
                user_service_healthy: true,
            },
            battery: BatteryConfig::default(),
            lighting: LightingConfig::default(),
            power: PowerPolicy::default(),
            mesh: MeshConfig {
                nodes: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                links: vec![
                    LinkConfig {
                        a: "A".to_string(),
                        b: "B".to_string(),
                        quality: 90.0,
                    },
                    LinkConfig {
                        a: "B".to_string(),
                        b: "C".to_string(),
                        quality: 80.0,
                    },
                ],
            },
            storage: StorageConfig::Memory,
            alert: AlertConfig {
                timeout_secs: 10,
                transport: AlertTransportConfig::Log,
            },
            telemetry: TelemetryConfig {
                enabled: false,
                http_addr: "0.0.0.0:8080".parse().unwrap(),
            },
        }
    }
}
