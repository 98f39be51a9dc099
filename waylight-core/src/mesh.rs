use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use jiff::civil::Time;
use serde::{Deserialize, Serialize};

use crate::health::HealthCheck;
use crate::BoxStr;

/// Bandwidth assigned to a node when it joins the mesh, before the power
/// manager has written a tier.
pub const BASELINE_BANDWIDTH_KBPS: f64 = 100.0;

/// Identifier of an addressable mesh node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(BoxStr);

impl NodeId {
    pub fn new(id: impl Into<BoxStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reachability of a node as reported by the field deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeState {
    Up,
    Down,
}

/// Per-node power tier; written by the power manager, never self-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshPowerMode {
    Normal,
    Reduced,
    Critical,
    Off,
}

/// Telemetry snapshot of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub state: NodeState,
    pub power_mode: MeshPowerMode,
    pub bandwidth_kbps: f64,
}

impl NodeStatus {
    fn baseline() -> Self {
        Self {
            state: NodeState::Up,
            power_mode: MeshPowerMode::Normal,
            bandwidth_kbps: BASELINE_BANDWIDTH_KBPS,
        }
    }
}

/// Symmetric edge key: the unordered pair of endpoint ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    fn touches(&self, id: &NodeId) -> bool {
        &self.0 == id || &self.1 == id
    }
}

/// Node/link ledger of the mesh deployment.
///
/// The edge set is the single source of truth for connectivity; adjacency
/// views are always derived from it.
#[derive(Debug, Default)]
pub struct MeshTopology {
    nodes: BTreeMap<NodeId, NodeStatus>,
    links: BTreeMap<EdgeKey, f64>,
}

impl MeshTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with baseline defaults. Re-adding an existing node
    /// leaves it untouched.
    pub fn add_node(&mut self, id: NodeId) {
        self.nodes.entry(id).or_insert_with(NodeStatus::baseline);
    }

    /// Remove a node and every link incident to it. No-op on an unknown id.
    pub fn remove_node(&mut self, id: &NodeId) {
        self.nodes.remove(id);
        self.links.retain(|key, _| !key.touches(id));
    }

    /// Store a symmetric link, creating missing endpoints. Quality is
    /// clamped to `[0, 100]`.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, quality: f64) {
        if a == b {
            return;
        }
        self.add_node(a.clone());
        self.add_node(b.clone());
        self.links
            .insert(EdgeKey::new(a, b), quality.clamp(0.0, 100.0));
    }

    /// Remove the symmetric link between two nodes. No-op on an absent
    /// edge.
    pub fn remove_link(&mut self, a: &NodeId, b: &NodeId) {
        self.links.remove(&EdgeKey::new(a.clone(), b.clone()));
    }

    /// Mark a node up or down. No-op on an unknown id.
    pub fn set_node_state(&mut self, id: &NodeId, state: NodeState) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.state = state;
        }
    }

    /// Write the power tier and bandwidth into every node.
    pub fn apply_power_profile(&mut self, power_mode: MeshPowerMode, bandwidth_kbps: f64) {
        for node in self.nodes.values_mut() {
            node.power_mode = power_mode;
            node.bandwidth_kbps = bandwidth_kbps;
        }
    }

    /// Adjacency projection of the edge set. Isolated nodes appear with an
    /// empty neighbor set.
    pub fn topology(&self) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
        let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> = self
            .nodes
            .keys()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();
        for EdgeKey(a, b) in self.links.keys() {
            adjacency.entry(a.clone()).or_default().insert(b.clone());
            adjacency.entry(b.clone()).or_default().insert(a.clone());
        }
        adjacency
    }

    /// Status snapshot of a single node; `None` for an unknown id.
    pub fn node_status(&self, id: &NodeId) -> Option<NodeStatus> {
        self.nodes.get(id).copied()
    }

    /// Status snapshot of every node, for telemetry and persistence.
    pub fn node_statuses(&self) -> BTreeMap<NodeId, NodeStatus> {
        self.nodes.clone()
    }

    /// Quality of the link between two nodes, if present.
    pub fn link_quality(&self, a: &NodeId, b: &NodeId) -> Option<f64> {
        self.links.get(&EdgeKey::new(a.clone(), b.clone())).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A single down node fails mesh health; an empty mesh is vacuously
    /// healthy.
    pub fn is_healthy(&self) -> bool {
        self.nodes.values().all(|n| n.state == NodeState::Up)
    }
}

impl HealthCheck for MeshTopology {
    fn name(&self) -> &'static str {
        "Mesh network"
    }

    fn health_check(&self, _now: Time) -> bool {
        self.is_healthy()
    }
}
