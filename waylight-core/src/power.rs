use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battery::BatteryModel;
use crate::lighting::LightingController;
use crate::mesh::{MeshPowerMode, MeshTopology};

/// System-wide operating tier, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerMode {
    Normal,
    Reduced,
    Critical,
    Emergency,
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PowerMode::Normal => "normal",
            PowerMode::Reduced => "reduced",
            PowerMode::Critical => "critical",
            PowerMode::Emergency => "emergency",
        };
        f.write_str(label)
    }
}

/// Lighting policy label published alongside the power mode. Distinct from
/// the controller's own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingMode {
    On,
    Dim,
    Off,
    Emergency,
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LightingMode::On => "on",
            LightingMode::Dim => "dim",
            LightingMode::Off => "off",
            LightingMode::Emergency => "emergency",
        };
        f.write_str(label)
    }
}

/// Thresholds and bandwidth tiers for mode derivation. Policy, not fact:
/// deployments tune these in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerPolicy {
    /// Below this charge percentage the system is in emergency.
    pub emergency_threshold_pct: f64,
    /// Below this charge percentage the system is critical.
    pub critical_threshold_pct: f64,
    /// Below this charge percentage the system runs reduced.
    pub reduced_threshold_pct: f64,
    /// Mesh bandwidth in normal mode.
    pub full_bandwidth_kbps: f64,
    /// Mesh bandwidth in reduced mode.
    pub reduced_bandwidth_kbps: f64,
    /// Mesh bandwidth in critical mode.
    pub minimal_bandwidth_kbps: f64,
    /// Mesh bandwidth floor while the system is in emergency; the mesh has
    /// no emergency tier of its own.
    pub emergency_bandwidth_floor_kbps: f64,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        Self {
            emergency_threshold_pct: 10.0,
            critical_threshold_pct: 25.0,
            reduced_threshold_pct: 50.0,
            full_bandwidth_kbps: 100.0,
            reduced_bandwidth_kbps: 50.0,
            minimal_bandwidth_kbps: 10.0,
            emergency_bandwidth_floor_kbps: 5.0,
        }
    }
}

/// Orchestrator of the control loop: derives the global power mode from
/// battery state and propagates it into mesh and lighting.
#[derive(Debug)]
pub struct PowerManager {
    policy: PowerPolicy,
    mode: PowerMode,
    lighting_mode: LightingMode,
}

impl PowerManager {
    pub fn new(policy: PowerPolicy) -> Self {
        Self {
            policy,
            mode: PowerMode::Normal,
            lighting_mode: LightingMode::Off,
        }
    }

    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    pub fn lighting_mode(&self) -> LightingMode {
        self.lighting_mode
    }

    /// Derive the mode and write it through to the mesh and, in emergency,
    /// the lighting controller. Idempotent for unchanged inputs; callers
    /// detect transitions by diffing `mode`/`lighting_mode` around the
    /// call.
    pub fn update(
        &mut self,
        battery: &BatteryModel,
        lighting: &mut LightingController,
        mesh: &mut MeshTopology,
    ) {
        self.mode = self.derive_mode(battery);

        let (mesh_mode, bandwidth_kbps) = match self.mode {
            PowerMode::Normal => (MeshPowerMode::Normal, self.policy.full_bandwidth_kbps),
            PowerMode::Reduced => (MeshPowerMode::Reduced, self.policy.reduced_bandwidth_kbps),
            PowerMode::Critical => (MeshPowerMode::Critical, self.policy.minimal_bandwidth_kbps),
            PowerMode::Emergency => (
                MeshPowerMode::Critical,
                self.policy.emergency_bandwidth_floor_kbps,
            ),
        };
        mesh.apply_power_profile(mesh_mode, bandwidth_kbps);

        self.lighting_mode = match self.mode {
            PowerMode::Normal => LightingMode::On,
            PowerMode::Reduced => LightingMode::Dim,
            PowerMode::Critical => LightingMode::Off,
            PowerMode::Emergency => LightingMode::Emergency,
        };
        if self.mode == PowerMode::Emergency {
            lighting.force_emergency();
        }
    }

    /// A failed battery health check short-circuits to emergency; otherwise
    /// the charge percentage picks the tier.
    fn derive_mode(&self, battery: &BatteryModel) -> PowerMode {
        if !battery.is_healthy() {
            return PowerMode::Emergency;
        }
        let pct = battery.percentage();
        if pct < self.policy.emergency_threshold_pct {
            PowerMode::Emergency
        } else if pct < self.policy.critical_threshold_pct {
            PowerMode::Critical
        } else if pct < self.policy.reduced_threshold_pct {
            PowerMode::Reduced
        } else {
            PowerMode::Normal
        }
    }
}
