use std::time::Duration;

use jiff::civil::Time;
use tracing::{error, info};

use waylight_core::{unhealthy_subsystems, HealthCheck};

use crate::alert::AlertTransport;

/// Polls the health of every subsystem and raises at most one alert per
/// cycle.
pub struct HealthMonitor<A> {
    transport: A,
    delivery_timeout: Duration,
}

impl<A: AlertTransport> HealthMonitor<A> {
    pub fn new(transport: A, delivery_timeout: Duration) -> Self {
        Self {
            transport,
            delivery_timeout,
        }
    }

    /// Evaluate the subsystems in order. Every failure is bundled into a
    /// single delivery; a broken or slow delivery channel is logged and
    /// swallowed so health evaluation is never disrupted.
    pub async fn check_and_alert(&self, subsystems: &[&dyn HealthCheck], now: Time) {
        let failing = unhealthy_subsystems(subsystems, now);
        if failing.is_empty() {
            info!("All subsystems healthy");
            return;
        }

        let message = format!(
            "ALERT: The following subsystems have issues: {}",
            failing.join(", ")
        );
        error!(failing = ?failing, "Subsystem health check failed");

        match tokio::time::timeout(self.delivery_timeout, self.transport.send(&message)).await {
            Ok(Ok(())) => info!("Alert delivered"),
            Ok(Err(e)) => error!(error = ?e, "Failed to deliver alert"),
            Err(_) => error!(
                timeout_secs = self.delivery_timeout.as_secs(),
                "Alert delivery timed out"
            ),
        }
    }
}

/// Health capability standing in for the external user service. The
/// service itself (accounts, sessions) lives outside this deployment; only
/// its health signal enters the aggregation.
#[derive(Debug, Clone, Copy)]
pub struct UserServiceProbe {
    healthy: bool,
}

impl UserServiceProbe {
    pub fn new(healthy: bool) -> Self {
        Self { healthy }
    }
}

impl HealthCheck for UserServiceProbe {
    fn name(&self) -> &'static str {
        "User service"
    }

    fn health_check(&self, _now: Time) -> bool {
        self.healthy
    }
}
