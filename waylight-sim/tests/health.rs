use std::time::Duration;

use jiff::civil::{time, Time};

use waylight_core::HealthCheck;
use waylight_sim::alert::MemoryAlert;
use waylight_sim::monitor::{HealthMonitor, UserServiceProbe};

const NOON: Time = time(12, 0, 0, 0);

struct FakeSubsystem {
    name: &'static str,
    healthy: bool,
}

impl HealthCheck for FakeSubsystem {
    fn name(&self) -> &'static str {
        self.name
    }

    fn health_check(&self, _now: Time) -> bool {
        self.healthy
    }
}

fn monitor() -> (HealthMonitor<MemoryAlert>, MemoryAlert) {
    let transport = MemoryAlert::default();
    let monitor = HealthMonitor::new(transport.clone(), Duration::from_secs(1));
    (monitor, transport)
}

#[tokio::test]
async fn all_healthy_delivers_nothing() {
    let (monitor, transport) = monitor();
    let battery = FakeSubsystem {
        name: "Battery subsystem",
        healthy: true,
    };
    let mesh = FakeSubsystem {
        name: "Mesh network",
        healthy: true,
    };

    monitor.check_and_alert(&[&battery, &mesh], NOON).await;

    assert!(transport.messages().is_empty());
}

#[tokio::test]
async fn single_failure_delivers_one_alert_naming_it() {
    let (monitor, transport) = monitor();
    let battery = FakeSubsystem {
        name: "Battery subsystem",
        healthy: false,
    };
    let mesh = FakeSubsystem {
        name: "Mesh network",
        healthy: true,
    };

    monitor.check_and_alert(&[&battery, &mesh], NOON).await;

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Battery subsystem"));
    assert!(!messages[0].contains("Mesh network"));
}

#[tokio::test]
async fn multiple_failures_are_bundled_into_one_delivery() {
    let (monitor, transport) = monitor();
    let battery = FakeSubsystem {
        name: "Battery subsystem",
        healthy: false,
    };
    let lighting = FakeSubsystem {
        name: "Lighting subsystem",
        healthy: false,
    };
    let mesh = FakeSubsystem {
        name: "Mesh network",
        healthy: true,
    };
    let users = FakeSubsystem {
        name: "User service",
        healthy: false,
    };

    monitor
        .check_and_alert(&[&battery, &lighting, &mesh, &users], NOON)
        .await;

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Battery subsystem"));
    assert!(messages[0].contains("Lighting subsystem"));
    assert!(messages[0].contains("User service"));
    assert!(!messages[0].contains("Mesh network"));
}

#[tokio::test]
async fn repeated_cycles_deliver_once_each() {
    let (monitor, transport) = monitor();
    let battery = FakeSubsystem {
        name: "Battery subsystem",
        healthy: false,
    };

    monitor.check_and_alert(&[&battery], NOON).await;
    monitor.check_and_alert(&[&battery], NOON).await;

    assert_eq!(transport.messages().len(), 2);
}

#[tokio::test]
async fn broken_transport_is_swallowed() {
    struct FailingTransport;

    #[async_trait::async_trait]
    impl waylight_sim::alert::AlertTransport for FailingTransport {
        type Error = std::io::Error;

        async fn send(&self, _message: &str) -> Result<(), Self::Error> {
            Err(std::io::Error::other("relay unreachable"))
        }
    }

    let monitor = HealthMonitor::new(FailingTransport, Duration::from_secs(1));
    let battery = FakeSubsystem {
        name: "Battery subsystem",
        healthy: false,
    };

    // Must not panic or propagate.
    monitor.check_and_alert(&[&battery], NOON).await;
}

#[tokio::test]
async fn user_service_probe_reports_configured_health() {
    let healthy = UserServiceProbe::new(true);
    let unhealthy = UserServiceProbe::new(false);

    assert!(healthy.health_check(NOON));
    assert!(!unhealthy.health_check(NOON));
    assert_eq!(healthy.name(), "User service");
}
