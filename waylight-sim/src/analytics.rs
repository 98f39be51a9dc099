use std::collections::BTreeMap;

use waylight_core::{BatteryHistoryRecord, MeshStatusRecord, NodeId, NodeState};

/// Mesh availability derived from persisted status snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshUptime {
    /// Number of snapshots considered.
    pub snapshots: usize,
    /// Fraction of snapshots in which every node was up; `None` without
    /// snapshots.
    pub all_up_fraction: Option<f64>,
    /// Per-node fraction of snapshots in which that node was up.
    pub node_up_fractions: BTreeMap<NodeId, f64>,
}

/// Compute uptime fractions over the mesh-status history.
pub fn mesh_uptime(records: &[MeshStatusRecord]) -> MeshUptime {
    let snapshots = records.len();
    if snapshots == 0 {
        return MeshUptime {
            snapshots,
            all_up_fraction: None,
            node_up_fractions: BTreeMap::new(),
        };
    }

    let mut all_up = 0usize;
    let mut up_counts: BTreeMap<NodeId, usize> = BTreeMap::new();
    for record in records {
        if record.nodes.values().all(|n| n.state == NodeState::Up) {
            all_up += 1;
        }
        for (id, status) in &record.nodes {
            let count = up_counts.entry(id.clone()).or_default();
            if status.state == NodeState::Up {
                *count += 1;
            }
        }
    }

    let node_up_fractions = up_counts
        .into_iter()
        .map(|(id, up)| (id, up as f64 / snapshots as f64))
        .collect();

    MeshUptime {
        snapshots,
        all_up_fraction: Some(all_up as f64 / snapshots as f64),
        node_up_fractions,
    }
}

/// Hours the lamps could run at full brightness: history entries above the
/// 50% charge threshold.
pub fn lighting_on_hours(history: &[BatteryHistoryRecord]) -> usize {
    history.iter().filter(|r| r.charge_pct > 50.0).count()
}

/// Linear extrapolation of the charge trend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatteryForecast {
    /// Hours until the pack reaches empty at the observed trend.
    DepletesIn(f64),
    /// Hours until the pack reaches full at the observed trend.
    FullIn(f64),
    /// Not enough history, or a flat trend.
    Unknown,
}

/// Forecast depletion or full charge from the battery history. Needs at
/// least three samples.
pub fn battery_forecast(history: &[BatteryHistoryRecord]) -> BatteryForecast {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return BatteryForecast::Unknown;
    };
    if history.len() < 3 {
        return BatteryForecast::Unknown;
    }

    let delta = last.charge_pct - first.charge_pct;
    let hours = history.len() as f64;
    if delta < 0.0 {
        let rate = -delta / hours;
        BatteryForecast::DepletesIn(last.charge_pct / rate)
    } else if delta > 0.0 {
        let rate = delta / hours;
        BatteryForecast::FullIn((100.0 - last.charge_pct) / rate)
    } else {
        BatteryForecast::Unknown
    }
}
