//! Boiler coordinator: reference counting of the zones demanding heat.
//!
//! One coordinator exists per process and is shared by `Arc` with every zone
//! controller. The boiler relay is switched exactly when the set of active
//! zones goes from empty to non-empty and back. Activation also wakes up the
//! other registered zones so they can opportunistically heat while the
//! boiler runs ("piggyback").

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use smartheat_domain::boiler::BoilerStatus;

use crate::ports::SwitchActuator;

/// Receives piggyback notifications for one registered zone.
pub trait PiggybackListener: Send + Sync {
    /// The boiler was just started on behalf of `initiator`.
    fn notify(&self, initiator: &str);
}

#[derive(Default)]
struct BoilerState {
    boiler_relay: Option<String>,
    active_zones: BTreeSet<String>,
    registry: BTreeMap<String, Arc<dyn PiggybackListener>>,
}

impl BoilerState {
    fn assign_relay(&mut self, zone: &str, relay: &str) {
        match &self.boiler_relay {
            None => self.boiler_relay = Some(relay.to_string()),
            Some(current) if current != relay => tracing::warn!(
                zone = %zone,
                current = %current,
                requested = %relay,
                "conflicting boiler relay, keeping the first one"
            ),
            Some(_) => {}
        }
    }
}

/// Shared owner of the boiler relay.
pub struct BoilerCoordinator<A> {
    actuator: A,
    state: Mutex<BoilerState>,
}

impl<A: SwitchActuator + Send + Sync> BoilerCoordinator<A> {
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            state: Mutex::new(BoilerState::default()),
        }
    }

    /// Register `zone` for piggyback notifications, replacing any previous
    /// listener under the same name.
    pub async fn register_zone(&self, zone: &str, listener: Arc<dyn PiggybackListener>) {
        let mut state = self.state.lock().await;
        state.registry.insert(zone.to_string(), listener);
        tracing::debug!(zone = %zone, "zone registered with boiler");
    }

    /// Stop notifying `zone`. Active membership is left untouched.
    pub async fn unregister_zone(&self, zone: &str) {
        let mut state = self.state.lock().await;
        state.registry.remove(zone);
        tracing::debug!(zone = %zone, "zone unregistered from boiler");
    }

    /// Mark `zone` as demanding heat.
    ///
    /// Returns `true` when this call started the boiler. Every other
    /// registered zone is then notified, after the coordinator lock is
    /// released.
    pub async fn turn_on(&self, zone: &str, boiler_relay: Option<&str>) -> bool {
        let listeners: Vec<Arc<dyn PiggybackListener>> = {
            let mut state = self.state.lock().await;
            if let Some(relay) = boiler_relay {
                state.assign_relay(zone, relay);
            }

            let was_idle = state.active_zones.is_empty();
            if !state.active_zones.insert(zone.to_string()) || !was_idle {
                tracing::debug!(
                    zone = %zone,
                    active = state.active_zones.len(),
                    "boiler already running"
                );
                return false;
            }

            let relay = state.boiler_relay.clone();
            self.switch_boiler(relay.as_deref(), true).await;
            state
                .registry
                .iter()
                .filter(|(name, _)| name.as_str() != zone)
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        for listener in listeners {
            listener.notify(zone);
        }
        true
    }

    /// Mark `zone` as no longer demanding heat.
    ///
    /// Returns `true` when this call stopped the boiler.
    pub async fn turn_off(&self, zone: &str) -> bool {
        let mut state = self.state.lock().await;
        if !state.active_zones.remove(zone) || !state.active_zones.is_empty() {
            return false;
        }
        let relay = state.boiler_relay.clone();
        self.switch_boiler(relay.as_deref(), false).await;
        true
    }

    pub async fn status(&self) -> BoilerStatus {
        let state = self.state.lock().await;
        BoilerStatus::new(
            state.boiler_relay.clone(),
            state.active_zones.iter().cloned().collect(),
        )
    }

    async fn switch_boiler(&self, relay: Option<&str>, on: bool) {
        let Some(relay) = relay else {
            tracing::warn!(on, "no boiler relay configured, skipping boiler command");
            return;
        };
        match self.actuator.set_switch(relay, on).await {
            Ok(()) => tracing::info!(entity_id = %relay, on, "boiler switched"),
            Err(err) => tracing::error!(entity_id = %relay, on, error = ?err, "failed to switch boiler"),
        }
    }
}
