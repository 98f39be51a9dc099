use std::collections::{BTreeMap, BTreeSet};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use jiff::Timestamp;
use serde::Serialize;
use tokio::sync::watch;

use waylight_core::{LightNode, LightState, LightingMode, NodeId, NodeStatus, PowerMode};

use crate::energy::HarvestSample;

/// Immutable per-tick snapshot for concurrent readers.
///
/// The driver publishes a fresh snapshot after each completed tick, so a
/// dashboard polling this surface never observes a half-updated mode
/// transition.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub timestamp: Timestamp,
    pub battery_pct: f64,
    pub battery_voltage: Option<f64>,
    pub lighting_state: LightState,
    pub lights: Vec<LightNode>,
    pub mode: PowerMode,
    pub lighting_mode: LightingMode,
    pub topology: BTreeMap<NodeId, BTreeSet<NodeId>>,
    pub node_statuses: BTreeMap<NodeId, NodeStatus>,
    pub harvest: HarvestSample,
}

type SnapshotRx = watch::Receiver<Option<TelemetrySnapshot>>;

/// Read-only router over the latest snapshot. No mutation routes.
pub fn router(rx: SnapshotRx) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/telemetry", get(telemetry_handler))
        .with_state(rx)
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn telemetry_handler(State(rx): State<SnapshotRx>) -> Json<Option<TelemetrySnapshot>> {
    let snapshot = rx.borrow().clone();
    Json(snapshot)
}
