use jiff::civil::Time;

/// Capability exposed by every monitored subsystem.
///
/// The aggregator holds an ordered list of these rather than hand-wired
/// fields, so new subsystems plug in without signature changes. `now` is
/// passed in because some predicates (lighting) depend on time of day;
/// subsystems that don't need it ignore it.
pub trait HealthCheck {
    /// Human-readable subsystem name used in alert messages.
    fn name(&self) -> &'static str;

    /// True while the subsystem is within acceptable operating bounds.
    fn health_check(&self, now: Time) -> bool;
}

/// Evaluate the subsystems in order and return the names of every
/// unhealthy one. Pure; cannot fail.
pub fn unhealthy_subsystems(subsystems: &[&dyn HealthCheck], now: Time) -> Vec<&'static str> {
    subsystems
        .iter()
        .filter(|s| !s.health_check(now))
        .map(|s| s.name())
        .collect()
}
