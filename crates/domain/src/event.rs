//! Event: an immutable record of an entity changing state on the host.
//!
//! The host platform delivers one [`StateChange`] per observed transition.
//! Zones subscribe to the entities they reference (sensor, relays, door
//! contacts, outdoor sensor) and react to these records.

use serde::{Deserialize, Serialize};

use crate::entity::EntityState;
use crate::time::{Timestamp, now};

/// An `(old, new)` state pair for a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub entity_id: String,
    pub old: Option<EntityState>,
    pub new: EntityState,
    pub timestamp: Timestamp,
}

impl StateChange {
    /// Create a state change stamped with the current time.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, old: Option<EntityState>, new: EntityState) -> Self {
        Self {
            entity_id: entity_id.into(),
            old,
            new,
            timestamp: now(),
        }
    }

    /// Whether the state value actually differs from the previous one.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.old.as_ref() != Some(&self.new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_transition_when_state_differs() {
        let change = StateChange::new("switch.relay", Some(EntityState::Off), EntityState::On);
        assert!(change.is_transition());
    }

    #[test]
    fn should_report_transition_when_old_state_is_missing() {
        let change = StateChange::new("sensor.temp", None, EntityState::from("20.1"));
        assert!(change.is_transition());
    }

    #[test]
    fn should_not_report_transition_for_identical_states() {
        let change = StateChange::new("switch.relay", Some(EntityState::On), EntityState::On);
        assert!(!change.is_transition());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let change = StateChange::new("binary_sensor.door", None, EntityState::On);
        let json = serde_json::to_string(&change).unwrap();
        let parsed: StateChange = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, change);
    }
}
