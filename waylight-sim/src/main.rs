use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use waylight_sim::alert::{AlertTransport, LogAlert, SmtpAlert};
use waylight_sim::config::{AlertTransportConfig, Config, StorageConfig};
use waylight_sim::driver::run_simulation;
use waylight_sim::monitor::HealthMonitor;
use waylight_sim::storage::memory::MemoryStore;
use waylight_sim::storage::sqlite::SqliteStore;
use waylight_sim::storage::RecordStore;
use waylight_sim::telemetry;

#[derive(Parser)]
#[command(name = "waylight-sim")]
#[command(about = "Waylight deployment simulator")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "waylight-sim.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,waylight_sim=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    match config.storage {
        StorageConfig::Memory => {
            info!("Using in-memory storage");
            let store = MemoryStore::default();
            run_with_store(config, store).await?;
        }
        StorageConfig::Sqlite { ref path } => {
            info!(path = ?path, "Using SQLite storage");
            let store = SqliteStore::new(path).await?;
            run_with_store(config, store).await?;
        }
    }

    Ok(())
}

async fn run_with_store<S>(config: Config, store: S) -> color_eyre::Result<()>
where
    S: RecordStore,
{
    match config.alert.transport.clone() {
        AlertTransportConfig::Log => {
            info!("Using log-only alert transport");
            run(config, store, LogAlert).await
        }
        AlertTransportConfig::Smtp {
            relay,
            port,
            username,
            password,
            from,
            to,
            subject,
        } => {
            info!(relay = %relay, to = %to, "Using SMTP alert transport");
            let transport = SmtpAlert::new(&relay, port, username, password, &from, &to, subject)?;
            run(config, store, transport).await
        }
    }
}

async fn run<S, A>(config: Config, store: S, transport: A) -> color_eyre::Result<()>
where
    S: RecordStore,
    A: AlertTransport,
{
    let monitor = HealthMonitor::new(transport, Duration::from_secs(config.alert.timeout_secs));
    let (snapshot_tx, snapshot_rx) = watch::channel(None);

    if config.telemetry.enabled {
        let router = telemetry::router(snapshot_rx);
        let listener = TcpListener::bind(config.telemetry.http_addr).await?;
        info!(http_addr = %config.telemetry.http_addr, "Telemetry server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = ?e, "Telemetry server error");
            }
        });
    }

    run_simulation(&config, store, monitor, snapshot_tx).await
}
