use rand::Rng;
use serde::Serialize;

/// Harvested-energy readings for one tick.
///
/// These are observational: they feed logs and telemetry while the battery
/// integrates against its configured harvest rate.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct HarvestSample {
    pub solar_w: f64,
    pub teg_w: f64,
}

/// Simulated solar-panel and thermoelectric-generator front end.
#[derive(Debug, Default)]
pub struct EnergyHarvestMonitor;

impl EnergyHarvestMonitor {
    pub fn new() -> Self {
        Self
    }

    /// Sample harvest output for the given hour of day. Solar follows a
    /// mid-day bell and is zero outside 06:00-18:00; the TEG trickles
    /// around a watt day and night.
    pub fn sample(&mut self, hour: i8) -> HarvestSample {
        let mut rng = rand::rng();

        let solar_w = if (6..18).contains(&hour) {
            let x = (f64::from(hour) - 12.0) / 6.0;
            let clear_sky = 35.0 * (1.0 - x * x);
            clear_sky.max(0.0) * rng.random_range(0.8..1.0)
        } else {
            0.0
        };
        let teg_w = rng.random_range(0.5..1.5);

        HarvestSample { solar_w, teg_w }
    }
}
