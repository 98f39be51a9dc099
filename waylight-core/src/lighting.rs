use jiff::civil::Time;
use serde::{Deserialize, Serialize};

use crate::battery::BatteryModel;
use crate::health::HealthCheck;

/// Operating state of the lamp string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LightState {
    On,
    Dim,
    Off,
    Emergency,
}

/// One lamp of the string, mirroring the controller-level state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightNode {
    pub index: usize,
    pub state: LightState,
}

/// Night window and battery thresholds for the lighting policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingConfig {
    /// Number of lamps driven by this controller.
    pub light_count: usize,
    /// Start of the night window, inclusive.
    pub night_start: Time,
    /// End of the night window, exclusive. A window that wraps midnight is
    /// expressed with `night_start > night_end`.
    pub night_end: Time,
    /// Charge percentage at or above which lamps run at full brightness.
    pub on_threshold_pct: f64,
    /// Charge percentage at or above which lamps run dimmed.
    pub dim_threshold_pct: f64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            light_count: 6,
            night_start: jiff::civil::time(18, 0, 0, 0),
            night_end: jiff::civil::time(6, 0, 0, 0),
            on_threshold_pct: 50.0,
            dim_threshold_pct: 20.0,
        }
    }
}

/// Time-of-day- and battery-driven light state machine.
#[derive(Debug)]
pub struct LightingController {
    config: LightingConfig,
    state: LightState,
}

impl LightingController {
    pub fn new(config: LightingConfig) -> Self {
        Self {
            config,
            state: LightState::Off,
        }
    }

    /// Recompute the state from time of day and battery charge. Daytime is
    /// always `Off`; at night the charge thresholds pick `On`, `Dim` or
    /// `Off`.
    pub fn update(&mut self, now: Time, battery: &BatteryModel) {
        let pct = battery.percentage();
        self.state = if self.is_night(now) {
            if pct >= self.config.on_threshold_pct {
                LightState::On
            } else if pct >= self.config.dim_threshold_pct {
                LightState::Dim
            } else {
                LightState::Off
            }
        } else {
            LightState::Off
        };
    }

    /// Manual override; authoritative until the next `update`.
    pub fn turn_on(&mut self) {
        self.state = LightState::On;
    }

    /// Manual override; authoritative until the next `update`.
    pub fn turn_off(&mut self) {
        self.state = LightState::Off;
    }

    /// Manual override; authoritative until the next `update`.
    pub fn dim(&mut self) {
        self.state = LightState::Dim;
    }

    /// Life-safety override applied by the power manager; pre-empts the
    /// time/charge-driven update for as long as the system stays in
    /// emergency.
    pub fn force_emergency(&mut self) {
        self.state = LightState::Emergency;
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    /// Per-lamp view, fanned out from the controller-level state.
    pub fn light_statuses(&self) -> Vec<LightNode> {
        (0..self.config.light_count)
            .map(|index| LightNode {
                index,
                state: self.state,
            })
            .collect()
    }

    pub fn is_night(&self, now: Time) -> bool {
        let (start, end) = (self.config.night_start, self.config.night_end);
        if start <= end {
            now >= start && now < end
        } else {
            now >= start || now < end
        }
    }

    /// Lamps that are anything but `On` during the night window are a
    /// fault; daytime lights-off is not.
    pub fn is_healthy(&self, now: Time) -> bool {
        !self.is_night(now) || self.state == LightState::On
    }
}

impl HealthCheck for LightingController {
    fn name(&self) -> &'static str {
        "Lighting subsystem"
    }

    fn health_check(&self, now: Time) -> bool {
        self.is_healthy(now)
    }
}
