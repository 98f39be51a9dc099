use jiff::civil::{time, Time};
use waylight_core::{
    BatteryConfig, BatteryModel, HealthCheck, LightState, LightingConfig, LightingController,
};

const NIGHT: Time = time(20, 0, 0, 0);
const DAY: Time = time(12, 0, 0, 0);

fn battery_at(pct: f64) -> BatteryModel {
    let config = BatteryConfig {
        capacity_ah: 100.0,
        ..BatteryConfig::default()
    };
    BatteryModel::new(&config, pct)
}

fn controller() -> LightingController {
    LightingController::new(LightingConfig::default())
}

#[test]
fn night_state_follows_battery_thresholds() {
    let mut lighting = controller();

    lighting.update(NIGHT, &battery_at(60.0));
    assert_eq!(lighting.state(), LightState::On);

    lighting.update(NIGHT, &battery_at(30.0));
    assert_eq!(lighting.state(), LightState::Dim);

    lighting.update(NIGHT, &battery_at(10.0));
    assert_eq!(lighting.state(), LightState::Off);
}

#[test]
fn daytime_is_off_regardless_of_charge() {
    let mut lighting = controller();

    lighting.update(DAY, &battery_at(100.0));
    assert_eq!(lighting.state(), LightState::Off);
}

#[test]
fn night_window_wraps_midnight() {
    let lighting = controller();

    assert!(lighting.is_night(time(18, 0, 0, 0)));
    assert!(lighting.is_night(time(23, 30, 0, 0)));
    assert!(lighting.is_night(time(3, 0, 0, 0)));
    assert!(!lighting.is_night(time(6, 0, 0, 0)));
    assert!(!lighting.is_night(DAY));
}

#[test]
fn manual_actions_hold_until_next_update() {
    let mut lighting = controller();

    lighting.turn_on();
    assert_eq!(lighting.state(), LightState::On);
    lighting.dim();
    assert_eq!(lighting.state(), LightState::Dim);
    lighting.turn_off();
    assert_eq!(lighting.state(), LightState::Off);

    // The next update recomputes from time of day and charge.
    lighting.update(NIGHT, &battery_at(60.0));
    assert_eq!(lighting.state(), LightState::On);
}

#[test]
fn light_statuses_fan_out_controller_state() {
    let mut lighting = LightingController::new(LightingConfig {
        light_count: 4,
        ..LightingConfig::default()
    });
    lighting.update(NIGHT, &battery_at(60.0));

    let statuses = lighting.light_statuses();
    assert_eq!(statuses.len(), 4);
    for (i, light) in statuses.iter().enumerate() {
        assert_eq!(light.index, i);
        assert_eq!(light.state, LightState::On);
    }
}

#[test]
fn health_fails_only_when_dark_at_night() {
    let mut lighting = controller();

    // Lights off at 20:00 on a depleted battery is a fault.
    lighting.update(NIGHT, &battery_at(10.0));
    assert_eq!(lighting.state(), LightState::Off);
    assert!(!lighting.health_check(NIGHT));

    lighting.update(NIGHT, &battery_at(60.0));
    assert!(lighting.health_check(NIGHT));

    // Daytime lights-off is not a fault.
    lighting.update(DAY, &battery_at(60.0));
    assert_eq!(lighting.state(), LightState::Off);
    assert!(lighting.health_check(DAY));
}

#[test]
fn forced_emergency_overrides_state() {
    let mut lighting = controller();

    lighting.update(NIGHT, &battery_at(60.0));
    lighting.force_emergency();
    assert_eq!(lighting.state(), LightState::Emergency);
    assert!(!lighting.health_check(NIGHT));
}
