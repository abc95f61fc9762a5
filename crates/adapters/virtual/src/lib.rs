//! # smartheat-adapter-virtual
//!
//! Virtual home that stands in for the host platform in demos and tests.
//!
//! | Part | Behaviour |
//! |------|-----------|
//! | [`VirtualHome`] | Holds entity states; implements `StateReader` and `SwitchActuator` |
//! | [`SwitchService`] | `turn_on` / `turn_off` / `toggle` on virtual switches |
//! | [`ThermalModel`] + [`spawn_simulation`] | Moves room temperatures according to relay states |
//!
//! Every state change (a switch command, a simulated reading, a call to
//! [`VirtualHome::set_state`]) is published through the configured
//! `StateChangePublisher`.
//!
//! ## Dependency rule
//!
//! Depends on `smartheat-app` (port traits) and `smartheat-domain` only.

mod devices;
mod error;
mod simulation;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use smartheat_app::ports::{StateChangePublisher, StateReader, SwitchActuator};
use smartheat_domain::entity::EntityState;
use smartheat_domain::error::SmartHeatError;
use smartheat_domain::event::StateChange;

pub use devices::{SwitchService, ThermalModel};
pub use error::VirtualError;
pub use simulation::{SimulatedRoom, spawn_simulation};

/// In-memory host: entity id → state.
pub struct VirtualHome<P> {
    states: Mutex<HashMap<String, EntityState>>,
    publisher: P,
}

impl<P: StateChangePublisher + Send + Sync> VirtualHome<P> {
    pub fn new(publisher: P) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            publisher,
        }
    }

    /// Current state of `entity_id`, if the home knows it.
    #[must_use]
    pub fn state(&self, entity_id: &str) -> Option<EntityState> {
        self.lock_states().get(entity_id).cloned()
    }

    /// Set an entity without publishing, e.g. to seed the home before
    /// anything subscribes.
    pub fn seed(&self, entity_id: &str, state: impl Into<EntityState>) {
        self.lock_states()
            .insert(entity_id.to_string(), state.into());
    }

    /// Set an entity and publish the resulting change.
    ///
    /// # Errors
    ///
    /// Returns the publisher's error.
    pub async fn set_state(
        &self,
        entity_id: &str,
        state: impl Into<EntityState>,
    ) -> Result<(), SmartHeatError> {
        let state = state.into();
        let old = self
            .lock_states()
            .insert(entity_id.to_string(), state.clone());
        self.publisher
            .publish(StateChange::new(entity_id, old, state))
            .await
    }

    /// Run a switch service on `entity_id` and publish the new state.
    ///
    /// Unknown entities are treated as switches in the `unknown` state.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::NotASwitch`] for sensors.
    pub async fn call_service(
        &self,
        entity_id: &str,
        service: SwitchService,
    ) -> Result<EntityState, SmartHeatError> {
        let current = self.state(entity_id).unwrap_or_default();
        let on = service != SwitchService::TurnOff;
        let next = service
            .apply(entity_id, &current)
            .map_err(|err| err.into_actuation(entity_id, on))?;
        self.set_state(entity_id, next.clone()).await?;
        tracing::debug!(entity_id = %entity_id, state = %next, "virtual switch changed");
        Ok(next)
    }

    fn lock_states(&self) -> MutexGuard<'_, HashMap<String, EntityState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: StateChangePublisher + Send + Sync> StateReader for VirtualHome<P> {
    async fn get_state(&self, entity_id: &str) -> Result<Option<EntityState>, SmartHeatError> {
        Ok(self.state(entity_id))
    }
}

impl<P: StateChangePublisher + Send + Sync> SwitchActuator for VirtualHome<P> {
    async fn set_switch(&self, entity_id: &str, on: bool) -> Result<(), SmartHeatError> {
        self.call_service(entity_id, SwitchService::from_on(on))
            .await
            .map(|_| ())
    }
}
