//! Heating supervisor: owns the running zones of one heating installation.
//!
//! The supervisor turns a [`HeatingConfig`] into zone actors, routes every
//! host state change to the zones referencing the entity, restores zone
//! state from the [`SnapshotStore`] and rebuilds a zone from scratch on
//! reload.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};

use smartheat_domain::boiler::BoilerStatus;
use smartheat_domain::error::{NotFoundError, SmartHeatError, ValidationError};
use smartheat_domain::event::StateChange;
use smartheat_domain::zone::{
    HeatingConfig, HvacMode, PresetMode, ZoneConfig, ZoneRuntimeState, ZoneStatus,
};

use crate::boiler::BoilerCoordinator;
use crate::ports::{Clock, HeatingControl, SnapshotStore, StateReader, SwitchActuator};
use crate::schedule_timer::SCHEDULE_TICK;
use crate::zone_actor::{ZoneHandle, spawn_zone};
use crate::zone_controller::ZonePorts;

struct ZoneEntry {
    config: Arc<ZoneConfig>,
    handle: ZoneHandle,
}

pub struct HeatingSupervisor<S, A, C, P> {
    ports: ZonePorts<S, A, C>,
    boiler: Arc<BoilerCoordinator<A>>,
    store: P,
    tick_period: Duration,
    zones: RwLock<BTreeMap<String, ZoneEntry>>,
}

impl<S, A, C, P> HeatingSupervisor<S, A, C, P>
where
    S: StateReader + Clone + Send + Sync + 'static,
    A: SwitchActuator + Clone + Send + Sync + 'static,
    C: Clock + Clone + 'static,
    P: SnapshotStore + Clone + Send + Sync + 'static,
{
    pub fn new(ports: ZonePorts<S, A, C>, boiler: Arc<BoilerCoordinator<A>>, store: P) -> Self {
        Self {
            ports,
            boiler,
            store,
            tick_period: SCHEDULE_TICK,
            zones: RwLock::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn boiler(&self) -> &Arc<BoilerCoordinator<A>> {
        &self.boiler
    }

    /// Validate the whole configuration, then start every zone.
    ///
    /// # Errors
    ///
    /// Returns a validation error (missing common settings, duplicate or
    /// invalid zone) before any zone is started.
    pub async fn start(&self, config: &HeatingConfig) -> Result<(), SmartHeatError> {
        let zones = config.zone_configs()?;
        let count = zones.len();
        for zone in zones {
            self.add_zone(zone).await?;
        }
        tracing::info!(zones = count, "heating supervisor started");
        Ok(())
    }

    /// Start one zone, restoring its last snapshot when there is one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateZone`] when a zone with the same
    /// name is already running.
    pub async fn add_zone(&self, config: ZoneConfig) -> Result<(), SmartHeatError> {
        let exists = self.read_zones().contains_key(&config.name);
        if exists {
            return Err(ValidationError::DuplicateZone(config.name).into());
        }

        let mut state = ZoneRuntimeState::default();
        match self.store.load(&config.name).await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    zone = %config.name,
                    hvac_mode = %snapshot.hvac_mode,
                    preset = %snapshot.preset_mode,
                    target = snapshot.target_temperature,
                    "restoring zone snapshot"
                );
                state.restore(&snapshot);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(zone = %config.name, error = ?err, "failed to load zone snapshot, using defaults");
            }
        }
        self.spawn(config, state);
        Ok(())
    }

    /// Rebuild a running zone from a fresh configuration, carrying over its
    /// runtime state. Relays are left as they are.
    ///
    /// Changes dispatched while the zone is down are not queued: the rebuilt
    /// controller re-reads its sensors and relays when it starts.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when no zone has this name.
    pub async fn reload_zone(&self, config: ZoneConfig) -> Result<(), SmartHeatError> {
        let entry = self
            .write_zones()
            .remove(&config.name)
            .ok_or_else(|| not_found(&config.name))?;
        let state = match entry.handle.shutdown(false).await {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(zone = %config.name, error = ?err, "zone had already stopped, reloading with defaults");
                ZoneRuntimeState::default()
            }
        };
        tracing::info!(zone = %config.name, "reloading zone");
        self.spawn(config, state);
        Ok(())
    }

    /// Stop a zone, release its relays and forget its snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when no zone has this name, or
    /// a storage error when the snapshot cannot be deleted.
    pub async fn remove_zone(&self, zone: &str) -> Result<(), SmartHeatError> {
        let entry = self
            .write_zones()
            .remove(zone)
            .ok_or_else(|| not_found(zone))?;
        if let Err(err) = entry.handle.shutdown(true).await {
            tracing::warn!(zone = %zone, error = ?err, "zone had already stopped");
        }
        self.store.delete(zone).await?;
        tracing::info!(zone = %zone, "zone removed");
        Ok(())
    }

    /// Forward `change` to every zone referencing the entity.
    ///
    /// Returns the number of zones it was delivered to. Changes that do not
    /// alter the state value are dropped.
    pub fn dispatch(&self, change: &StateChange) -> usize {
        if !change.is_transition() {
            return 0;
        }
        let zones = self.read_zones();
        let mut delivered = 0;
        for entry in zones
            .values()
            .filter(|entry| {
                entry
                    .config
                    .watched_entities()
                    .any(|id| id == change.entity_id)
            })
        {
            if entry.handle.notify(change.clone()) {
                delivered += 1;
            } else {
                tracing::warn!(zone = %entry.handle.name(), entity_id = %change.entity_id, "zone stopped, dropping state change");
            }
        }
        if delivered == 0 {
            tracing::debug!(entity_id = %change.entity_id, "no running zone watches this entity");
        }
        delivered
    }

    /// Dispatch state changes from the event bus until it closes.
    pub async fn run(&self, mut events: broadcast::Receiver<StateChange>) {
        loop {
            match events.recv().await {
                Ok(change) => {
                    self.dispatch(&change);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event bus lagged, state changes dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("event bus closed, supervisor loop exited");
    }

    pub fn zone_names(&self) -> Vec<String> {
        self.read_zones().keys().cloned().collect()
    }

    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when no zone has this name.
    pub fn handle(&self, zone: &str) -> Result<ZoneHandle, SmartHeatError> {
        self.read_zones()
            .get(zone)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| not_found(zone))
    }

    /// Stop every zone without touching relays.
    pub async fn shutdown(&self) {
        let zones = std::mem::take(&mut *self.write_zones());
        for (name, entry) in zones {
            if let Err(err) = entry.handle.shutdown(false).await {
                tracing::warn!(zone = %name, error = ?err, "zone had already stopped");
            }
        }
        tracing::info!("heating supervisor stopped");
    }

    fn spawn(&self, config: ZoneConfig, state: ZoneRuntimeState) {
        let config = Arc::new(config);
        let handle = spawn_zone(
            Arc::clone(&config),
            state,
            self.ports.clone(),
            Arc::clone(&self.boiler),
            self.store.clone(),
            self.tick_period,
        );
        self.write_zones()
            .insert(config.name.clone(), ZoneEntry { config, handle });
    }

    fn read_zones(&self) -> RwLockReadGuard<'_, BTreeMap<String, ZoneEntry>> {
        self.zones.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_zones(&self) -> RwLockWriteGuard<'_, BTreeMap<String, ZoneEntry>> {
        self.zones.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, A, C, P> HeatingControl for HeatingSupervisor<S, A, C, P>
where
    S: StateReader + Clone + Send + Sync + 'static,
    A: SwitchActuator + Clone + Send + Sync + 'static,
    C: Clock + Clone + 'static,
    P: SnapshotStore + Clone + Send + Sync + 'static,
{
    async fn list_zones(&self) -> Vec<ZoneStatus> {
        let handles: Vec<ZoneHandle> = self
            .read_zones()
            .values()
            .map(|entry| entry.handle.clone())
            .collect();
        let mut statuses = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.status().await {
                Ok(status) => statuses.push(status),
                Err(err) => tracing::warn!(zone = %handle.name(), error = ?err, "zone did not answer"),
            }
        }
        statuses
    }

    async fn zone_status(&self, zone: &str) -> Result<ZoneStatus, SmartHeatError> {
        let handle = self.handle(zone)?;
        handle.status().await
    }

    async fn set_target_temperature(
        &self,
        zone: &str,
        value: f64,
    ) -> Result<ZoneStatus, SmartHeatError> {
        let handle = self.handle(zone)?;
        handle.set_target_temperature(value).await
    }

    async fn set_hvac_mode(&self, zone: &str, mode: HvacMode) -> Result<ZoneStatus, SmartHeatError> {
        let handle = self.handle(zone)?;
        handle.set_hvac_mode(mode).await
    }

    async fn set_preset_mode(
        &self,
        zone: &str,
        preset: PresetMode,
    ) -> Result<ZoneStatus, SmartHeatError> {
        let handle = self.handle(zone)?;
        handle.set_preset_mode(preset).await
    }

    async fn boiler_status(&self) -> BoilerStatus {
        self.boiler.status().await
    }
}

fn not_found(zone: &str) -> SmartHeatError {
    NotFoundError {
        entity: "Zone",
        id: zone.to_string(),
    }
    .into()
}
