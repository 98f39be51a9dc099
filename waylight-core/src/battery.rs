use jiff::Timestamp;
use jiff::civil::Time;
use serde::{Deserialize, Serialize};

use crate::health::HealthCheck;

/// Lower bound of the pack discharge curve, in volts.
pub const VOLTAGE_MIN: f64 = 3.0;
/// Upper bound of the pack discharge curve, in volts.
pub const VOLTAGE_MAX: f64 = 4.2;

/// Electrical parameters of the deployment's battery pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Usable pack capacity.
    pub capacity_ah: f64,
    /// Steady-state draw of lighting and mesh radios.
    pub consumption_rate_a: f64,
    /// Nominal harvest current while charging.
    pub harvest_rate_a: f64,
    /// A last-read voltage at or below this value marks the pack unhealthy.
    pub low_voltage_cutoff: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_ah: 5.0,
            consumption_rate_a: 0.2,
            harvest_rate_a: 0.5,
            low_voltage_cutoff: 3.2,
        }
    }
}

/// One entry of the append-only voltage history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoltageSample {
    pub timestamp: Timestamp,
    pub voltage: f64,
}

/// Coulomb-counting model of the deployment battery.
///
/// All mutating operations are total: out-of-range physics is absorbed by
/// clamping, never rejected.
#[derive(Debug)]
pub struct BatteryModel {
    capacity_ah: f64,
    charge_ah: f64,
    consumption_rate_a: f64,
    harvest_rate_a: f64,
    low_voltage_cutoff: f64,
    voltage_history: Vec<VoltageSample>,
}

impl BatteryModel {
    /// Create a model from its configuration and the charge persisted by a
    /// previous run (0.0 on cold start).
    pub fn new(config: &BatteryConfig, initial_charge_ah: f64) -> Self {
        let capacity_ah = config.capacity_ah.max(0.0);
        Self {
            capacity_ah,
            charge_ah: initial_charge_ah.clamp(0.0, capacity_ah),
            consumption_rate_a: config.consumption_rate_a,
            harvest_rate_a: config.harvest_rate_a,
            low_voltage_cutoff: config.low_voltage_cutoff,
            voltage_history: Vec::new(),
        }
    }

    /// Integrate harvested energy over the given duration, clamped to
    /// capacity.
    pub fn simulate_charge(&mut self, hours: f64) {
        let hours = hours.max(0.0);
        self.charge_ah =
            (self.charge_ah + self.harvest_rate_a * hours).clamp(0.0, self.capacity_ah);
    }

    /// Integrate load draw over the given duration, clamped at empty.
    pub fn simulate_discharge(&mut self, hours: f64) {
        let hours = hours.max(0.0);
        self.charge_ah = (self.charge_ah - self.consumption_rate_a * hours).max(0.0);
    }

    /// Map the state of charge through the discharge curve, append the
    /// sample to the history and return it.
    pub fn read_voltage(&mut self, timestamp: Timestamp) -> f64 {
        let voltage = VOLTAGE_MIN + (VOLTAGE_MAX - VOLTAGE_MIN) * self.percentage() / 100.0;
        self.voltage_history.push(VoltageSample { timestamp, voltage });
        voltage
    }

    /// State of charge in `[0, 100]`.
    pub fn percentage(&self) -> f64 {
        if self.capacity_ah <= 0.0 {
            return 0.0;
        }
        (self.charge_ah / self.capacity_ah * 100.0).clamp(0.0, 100.0)
    }

    pub fn charge_ah(&self) -> f64 {
        self.charge_ah
    }

    pub fn capacity_ah(&self) -> f64 {
        self.capacity_ah
    }

    pub fn consumption_rate_a(&self) -> f64 {
        self.consumption_rate_a
    }

    /// Most recently recorded voltage, if any reading has happened yet.
    pub fn last_voltage(&self) -> Option<f64> {
        self.voltage_history.last().map(|s| s.voltage)
    }

    pub fn voltage_history(&self) -> &[VoltageSample] {
        &self.voltage_history
    }

    /// A pack with no readings yet is considered healthy; once readings
    /// exist, the last one must sit above the low-voltage cutoff.
    pub fn is_healthy(&self) -> bool {
        self.last_voltage()
            .is_none_or(|v| v > self.low_voltage_cutoff)
    }
}

impl HealthCheck for BatteryModel {
    fn name(&self) -> &'static str {
        "Battery subsystem"
    }

    fn health_check(&self, _now: Time) -> bool {
        self.is_healthy()
    }
}
