use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::mesh::{NodeId, NodeStatus};
use crate::BoxStr;

/// Unique identifier for an event-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Ulid);

/// The single overwritten battery-state record; absent on cold start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatteryStateRecord {
    pub charge_ah: f64,
}

/// One append-only battery-history entry per tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatteryHistoryRecord {
    pub timestamp: Timestamp,
    pub voltage: f64,
    pub current_a: f64,
    pub charge_pct: f64,
}

/// One append-only event-log entry per observed mode transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub event: BoxStr,
}

/// Per-tick snapshot of every mesh node, for uptime analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshStatusRecord {
    pub timestamp: Timestamp,
    pub nodes: BTreeMap<NodeId, NodeStatus>,
}
