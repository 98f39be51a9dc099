use jiff::{Span, Timestamp, Zoned};
use tokio::sync::watch;
use tracing::{debug, info};
use ulid::Ulid;

use waylight_core::{
    BatteryHistoryRecord, BatteryModel, BatteryStateRecord, EventId, EventRecord, HealthCheck,
    LightingController, LightingMode, MeshStatusRecord, MeshTopology, NodeId, PowerManager,
    PowerMode,
};

use crate::alert::AlertTransport;
use crate::config::Config;
use crate::energy::EnergyHarvestMonitor;
use crate::monitor::{HealthMonitor, UserServiceProbe};
use crate::storage::RecordStore;
use crate::telemetry::TelemetrySnapshot;

/// Run the simulation: one tick per simulated hour, sequential, no
/// overlapping ticks.
///
/// Per tick: harvest sample, battery charge/discharge/voltage read, power
/// manager update, lighting update (pre-empted while the system is in
/// emergency), health aggregation, persistence, mode-transition event
/// records and a telemetry snapshot publish.
pub async fn run_simulation<S, A>(
    config: &Config,
    store: S,
    monitor: HealthMonitor<A>,
    snapshot_tx: watch::Sender<Option<TelemetrySnapshot>>,
) -> color_eyre::Result<()>
where
    S: RecordStore,
    A: AlertTransport,
{
    // Cold start: an absent record means an empty pack, not an error. A
    // malformed record aborts here, before any derived state exists.
    let initial_charge_ah = store
        .load_battery_state()
        .await?
        .map(|r| r.charge_ah)
        .unwrap_or(0.0);

    let mut battery = BatteryModel::new(&config.battery, initial_charge_ah);
    let mut lighting = LightingController::new(config.lighting.clone());
    let mut mesh = MeshTopology::new();
    for node in &config.mesh.nodes {
        mesh.add_node(NodeId::from(node.as_str()));
    }
    for link in &config.mesh.links {
        mesh.add_link(
            NodeId::from(link.a.as_str()),
            NodeId::from(link.b.as_str()),
            link.quality,
        );
    }
    let mut power = PowerManager::new(config.power.clone());
    let mut energy = EnergyHarvestMonitor::new();
    let user_service = UserServiceProbe::new(config.simulation.user_service_healthy);

    info!(
        initial_charge_ah,
        node_count = mesh.node_count(),
        topology = ?mesh.topology(),
        "Starting simulation"
    );

    let mut curr: Zoned = Timestamp::now().in_tz(&config.simulation.timezone)?;
    let mut last_mode: Option<PowerMode> = None;
    let mut last_lighting_mode: Option<LightingMode> = None;

    for _ in 0..config.simulation.hours {
        info!(hour = %curr, "Simulating hour");

        let harvest = energy.sample(curr.hour());
        debug!(
            solar_w = harvest.solar_w,
            teg_w = harvest.teg_w,
            "Harvest sample"
        );

        battery.simulate_charge(1.0);
        battery.simulate_discharge(1.0);
        let voltage = battery.read_voltage(curr.timestamp());

        power.update(&battery, &mut lighting, &mut mesh);
        if power.mode() != PowerMode::Emergency {
            lighting.update(curr.time(), &battery);
        }

        let subsystems: [&dyn HealthCheck; 4] = [&battery, &lighting, &mesh, &user_service];
        monitor.check_and_alert(&subsystems, curr.time()).await;

        // Persistence must complete before the tick counts as done.
        store
            .save_battery_state(BatteryStateRecord {
                charge_ah: battery.charge_ah(),
            })
            .await?;
        store
            .append_battery_history(BatteryHistoryRecord {
                timestamp: curr.timestamp(),
                voltage,
                current_a: battery.consumption_rate_a(),
                charge_pct: battery.percentage(),
            })
            .await?;
        store
            .append_mesh_status(MeshStatusRecord {
                timestamp: curr.timestamp(),
                nodes: mesh.node_statuses(),
            })
            .await?;

        if last_mode != Some(power.mode()) {
            info!(mode = %power.mode(), "Power mode transition");
            store
                .append_event(EventRecord {
                    id: EventId(Ulid::new()),
                    timestamp: curr.timestamp(),
                    event: format!("Mesh mode changed to {} at {}", power.mode(), curr).into(),
                })
                .await?;
            last_mode = Some(power.mode());
        }
        if last_lighting_mode != Some(power.lighting_mode()) {
            info!(lighting_mode = %power.lighting_mode(), "Lighting mode transition");
            store
                .append_event(EventRecord {
                    id: EventId(Ulid::new()),
                    timestamp: curr.timestamp(),
                    event: format!(
                        "Lighting mode changed to {} at {}",
                        power.lighting_mode(),
                        curr
                    )
                    .into(),
                })
                .await?;
            last_lighting_mode = Some(power.lighting_mode());
        }

        let _ = snapshot_tx.send(Some(TelemetrySnapshot {
            timestamp: curr.timestamp(),
            battery_pct: battery.percentage(),
            battery_voltage: battery.last_voltage(),
            lighting_state: lighting.state(),
            lights: lighting.light_statuses(),
            mode: power.mode(),
            lighting_mode: power.lighting_mode(),
            topology: mesh.topology(),
            node_statuses: mesh.node_statuses(),
            harvest,
        }));

        curr = curr.checked_add(Span::new().hours(1))?;
    }

    info!(topology = ?mesh.topology(), "Simulation complete");
    Ok(())
}
