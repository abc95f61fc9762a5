//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::NaiveTime;

use smartheat_domain::entity::EntityState;
use smartheat_domain::error::{ActuationError, SmartHeatError};
use smartheat_domain::zone::ZoneSnapshot;

use crate::ports::{Clock, SnapshotStore, StateReader, SwitchActuator};

// ── Fake home ───────────────────────────────────────────────────────

/// Entity states plus a log of every switch command.
#[derive(Default)]
pub struct FakeHome {
    states: Mutex<HashMap<String, EntityState>>,
    commands: Mutex<Vec<(String, bool)>>,
    failing: AtomicBool,
}

impl FakeHome {
    pub fn set(&self, entity_id: &str, state: impl Into<EntityState>) {
        self.states
            .lock()
            .unwrap()
            .insert(entity_id.to_string(), state.into());
    }

    pub fn state(&self, entity_id: &str) -> Option<EntityState> {
        self.states.lock().unwrap().get(entity_id).cloned()
    }

    pub fn commands(&self) -> Vec<(String, bool)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn commands_for(&self, entity_id: &str) -> Vec<bool> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == entity_id)
            .map(|(_, on)| *on)
            .collect()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }

    pub fn fail_switches(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl StateReader for FakeHome {
    async fn get_state(&self, entity_id: &str) -> Result<Option<EntityState>, SmartHeatError> {
        Ok(self.state(entity_id))
    }
}

impl SwitchActuator for FakeHome {
    async fn set_switch(&self, entity_id: &str, on: bool) -> Result<(), SmartHeatError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ActuationError {
                entity_id: entity_id.to_string(),
                on,
                reason: "offline".to_string(),
            }
            .into());
        }
        self.commands
            .lock()
            .unwrap()
            .push((entity_id.to_string(), on));
        let state = if on { EntityState::On } else { EntityState::Off };
        self.set(entity_id, state);
        Ok(())
    }
}

// ── Fixed clock ─────────────────────────────────────────────────────

pub struct FixedClock(Mutex<NaiveTime>);

impl FixedClock {
    pub fn at(hour: u32, minute: u32) -> Self {
        Self(Mutex::new(NaiveTime::from_hms_opt(hour, minute, 0).unwrap()))
    }

    pub fn set(&self, hour: u32, minute: u32) {
        *self.0.lock().unwrap() = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
    }
}

impl Clock for FixedClock {
    fn time_of_day(&self) -> NaiveTime {
        *self.0.lock().unwrap()
    }
}

// ── In-memory snapshot store ────────────────────────────────────────

#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshots: Mutex<HashMap<String, ZoneSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn get(&self, zone: &str) -> Option<ZoneSnapshot> {
        self.snapshots.lock().unwrap().get(zone).cloned()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self, zone: &str) -> Result<Option<ZoneSnapshot>, SmartHeatError> {
        Ok(self.get(zone))
    }

    async fn save(&self, snapshot: ZoneSnapshot) -> Result<(), SmartHeatError> {
        self.snapshots
            .lock()
            .unwrap()
            .insert(snapshot.zone.clone(), snapshot);
        Ok(())
    }

    async fn delete(&self, zone: &str) -> Result<(), SmartHeatError> {
        self.snapshots.lock().unwrap().remove(zone);
        Ok(())
    }
}
