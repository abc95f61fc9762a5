//! Boiler: observable state of the shared boiler relay.

use serde::{Deserialize, Serialize};

/// Snapshot of the boiler coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoilerStatus {
    /// Relay assigned on first activation, if any.
    pub boiler_relay: Option<String>,
    /// Zones currently demanding heat, sorted by name.
    pub active_zones: Vec<String>,
    pub active_count: usize,
    /// The relay is on iff at least one zone is active.
    pub relay_on: bool,
}

impl BoilerStatus {
    /// Build a status from the relay and the (sorted) active zones.
    #[must_use]
    pub fn new(boiler_relay: Option<String>, active_zones: Vec<String>) -> Self {
        Self {
            boiler_relay,
            active_count: active_zones.len(),
            relay_on: !active_zones.is_empty(),
            active_zones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_relay_off_when_no_zone_is_active() {
        let status = BoilerStatus::new(Some("switch.boiler".to_string()), vec![]);
        assert!(!status.relay_on);
        assert_eq!(status.active_count, 0);
    }

    #[test]
    fn should_count_active_zones() {
        let status = BoilerStatus::new(None, vec!["bath".to_string(), "living".to_string()]);
        assert!(status.relay_on);
        assert_eq!(status.active_count, 2);
    }
}
