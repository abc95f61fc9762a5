//! Zone actor: one tokio task per zone draining a single-consumer mailbox.
//!
//! Every input of a zone (host state changes, schedule ticks, piggyback
//! notifications and user commands) becomes a [`ZoneMessage`]. Messages are
//! processed one at a time, so the [`ZoneController`] is never shared.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;

use smartheat_domain::error::{NotFoundError, SmartHeatError};
use smartheat_domain::event::StateChange;
use smartheat_domain::zone::{
    HvacMode, PresetMode, ZoneConfig, ZoneRuntimeState, ZoneStatus,
};

use crate::boiler::{BoilerCoordinator, PiggybackListener};
use crate::ports::{Clock, SnapshotStore, StateReader, SwitchActuator};
use crate::zone_controller::{ZoneController, ZonePorts};

#[derive(Debug)]
pub enum ZoneMessage {
    StateChanged(StateChange),
    ScheduleTick,
    Piggyback {
        initiator: String,
    },
    SetTargetTemperature {
        value: f64,
        reply: oneshot::Sender<Result<ZoneStatus, SmartHeatError>>,
    },
    SetHvacMode {
        mode: HvacMode,
        reply: oneshot::Sender<ZoneStatus>,
    },
    SetPresetMode {
        preset: PresetMode,
        reply: oneshot::Sender<ZoneStatus>,
    },
    Status {
        reply: oneshot::Sender<ZoneStatus>,
    },
    /// Stop the zone and hand back its runtime state.
    Shutdown {
        release: bool,
        reply: oneshot::Sender<ZoneRuntimeState>,
    },
}

/// Piggyback listener posting into a zone mailbox.
pub struct MailboxListener {
    mailbox: WeakUnboundedSender<ZoneMessage>,
}

impl MailboxListener {
    pub fn new(mailbox: WeakUnboundedSender<ZoneMessage>) -> Self {
        Self { mailbox }
    }
}

impl PiggybackListener for MailboxListener {
    fn notify(&self, initiator: &str) {
        if let Some(sender) = self.mailbox.upgrade() {
            let _ = sender.send(ZoneMessage::Piggyback {
                initiator: initiator.to_string(),
            });
        }
    }
}

/// Cloneable address of a running zone.
#[derive(Debug, Clone)]
pub struct ZoneHandle {
    name: String,
    sender: UnboundedSender<ZoneMessage>,
}

impl ZoneHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forward a state change. Returns `false` once the zone has stopped.
    pub fn notify(&self, change: StateChange) -> bool {
        self.sender.send(ZoneMessage::StateChanged(change)).is_ok()
    }

    /// # Errors
    ///
    /// Returns a validation error for an out-of-range value, or
    /// [`SmartHeatError::NotFound`] when the zone has stopped.
    pub async fn set_target_temperature(&self, value: f64) -> Result<ZoneStatus, SmartHeatError> {
        self.request(|reply| ZoneMessage::SetTargetTemperature { value, reply })
            .await?
    }

    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when the zone has stopped.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<ZoneStatus, SmartHeatError> {
        self.request(|reply| ZoneMessage::SetHvacMode { mode, reply })
            .await
    }

    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when the zone has stopped.
    pub async fn set_preset_mode(&self, preset: PresetMode) -> Result<ZoneStatus, SmartHeatError> {
        self.request(|reply| ZoneMessage::SetPresetMode { preset, reply })
            .await
    }

    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when the zone has stopped.
    pub async fn status(&self) -> Result<ZoneStatus, SmartHeatError> {
        self.request(|reply| ZoneMessage::Status { reply }).await
    }

    /// Stop the zone task. With `release`, the zone stops heating first.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHeatError::NotFound`] when the zone had already stopped.
    pub async fn shutdown(self, release: bool) -> Result<ZoneRuntimeState, SmartHeatError> {
        self.request(|reply| ZoneMessage::Shutdown { release, reply })
            .await
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> ZoneMessage,
    ) -> Result<T, SmartHeatError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(message(reply))
            .map_err(|_| self.stopped())?;
        response.await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> SmartHeatError {
        NotFoundError {
            entity: "Zone",
            id: self.name.clone(),
        }
        .into()
    }
}

/// Spawn the task driving one zone and return its handle.
///
/// The zone starts (see [`ZoneController::start`]) before its first message
/// is processed. Whenever the persisted part of its state changes, a
/// snapshot is saved through `store`.
pub fn spawn_zone<S, A, C, P>(
    config: Arc<ZoneConfig>,
    state: ZoneRuntimeState,
    ports: ZonePorts<S, A, C>,
    boiler: Arc<BoilerCoordinator<A>>,
    store: P,
    tick_period: Duration,
) -> ZoneHandle
where
    S: StateReader + Send + Sync + 'static,
    A: SwitchActuator + Send + Sync + 'static,
    C: Clock + 'static,
    P: SnapshotStore + Send + Sync + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let name = config.name.clone();
    let persisted = PersistedFields::of(&state);
    let controller = ZoneController::new(config, state, ports, boiler, sender.downgrade())
        .with_tick_period(tick_period);
    let actor = ZoneActor {
        controller,
        store,
        persisted,
    };
    tokio::spawn(actor.run(receiver));
    ZoneHandle { name, sender }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PersistedFields {
    target_temperature: f64,
    hvac_mode: HvacMode,
    preset_mode: PresetMode,
}

impl PersistedFields {
    fn of(state: &ZoneRuntimeState) -> Self {
        Self {
            target_temperature: state.target_temperature,
            hvac_mode: state.hvac_mode,
            preset_mode: state.preset_mode,
        }
    }
}

struct ZoneActor<S, A, C, P> {
    controller: ZoneController<S, A, C>,
    store: P,
    persisted: PersistedFields,
}

impl<S, A, C, P> ZoneActor<S, A, C, P>
where
    S: StateReader + Send + Sync,
    A: SwitchActuator + Send + Sync,
    C: Clock,
    P: SnapshotStore + Send + Sync,
{
    async fn run(mut self, mut receiver: UnboundedReceiver<ZoneMessage>) {
        self.controller.start().await;
        self.persist().await;

        while let Some(message) = receiver.recv().await {
            match message {
                ZoneMessage::StateChanged(change) => {
                    self.controller.handle_state_change(&change).await;
                    self.persist().await;
                }
                ZoneMessage::ScheduleTick => {
                    self.controller.on_schedule_tick().await;
                    self.persist().await;
                }
                ZoneMessage::Piggyback { initiator } => {
                    self.controller.piggyback_check(&initiator).await;
                }
                ZoneMessage::SetTargetTemperature { value, reply } => {
                    let result = self.controller.set_target_temperature(value).await;
                    self.persist().await;
                    let _ = reply.send(result.map(|()| self.controller.status()));
                }
                ZoneMessage::SetHvacMode { mode, reply } => {
                    self.controller.set_hvac_mode(mode).await;
                    self.persist().await;
                    let _ = reply.send(self.controller.status());
                }
                ZoneMessage::SetPresetMode { preset, reply } => {
                    self.controller.set_preset_mode(preset).await;
                    self.persist().await;
                    let _ = reply.send(self.controller.status());
                }
                ZoneMessage::Status { reply } => {
                    let _ = reply.send(self.controller.status());
                }
                ZoneMessage::Shutdown { release, reply } => {
                    let state = self.controller.teardown(release).await;
                    let _ = reply.send(state);
                    return;
                }
            }
        }

        tracing::debug!(zone = %self.controller.name(), "all handles dropped");
        self.controller.teardown(false).await;
    }

    async fn persist(&mut self) {
        let state = self.controller.state();
        let fields = PersistedFields::of(state);
        if fields == self.persisted {
            return;
        }
        let snapshot = state.snapshot(self.controller.name());
        match self.store.save(snapshot).await {
            Ok(()) => {
                self.persisted = fields;
                tracing::debug!(zone = %self.controller.name(), "zone snapshot saved");
            }
            Err(err) => {
                tracing::warn!(zone = %self.controller.name(), error = ?err, "failed to save zone snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartheat_domain::entity::EntityState;
    use smartheat_domain::zone::{CommonSettings, ZoneSettings};

    use crate::schedule_timer::SCHEDULE_TICK;
    use crate::testing::{FakeHome, FixedClock, InMemorySnapshotStore};

    const SENSOR: &str = "sensor.living_temperature";
    const RELAY: &str = "switch.living_valve";

    fn config() -> Arc<ZoneConfig> {
        let settings = ZoneSettings {
            name: "living".to_string(),
            sensor: Some(SENSOR.to_string()),
            relays: vec![RELAY.to_string()],
            ..ZoneSettings::default()
        };
        let common = CommonSettings {
            boiler_relay: Some("switch.boiler".to_string()),
            ..CommonSettings::default()
        };
        Arc::new(ZoneConfig::from_settings(&settings, &common).unwrap())
    }

    fn spawn(
        home: &Arc<FakeHome>,
        store: &Arc<InMemorySnapshotStore>,
        state: ZoneRuntimeState,
    ) -> ZoneHandle {
        let ports = ZonePorts {
            reader: Arc::clone(home),
            actuator: Arc::clone(home),
            clock: Arc::new(FixedClock::at(12, 0)),
        };
        let boiler = Arc::new(BoilerCoordinator::new(Arc::clone(home)));
        spawn_zone(config(), state, ports, boiler, Arc::clone(store), SCHEDULE_TICK)
    }

    #[tokio::test]
    async fn should_answer_status_requests() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        home.set(SENSOR, 19.5);

        let handle = spawn(&home, &store, ZoneRuntimeState::default());
        let status = handle.status().await.unwrap();

        assert_eq!(status.name, "living");
        assert_eq!(status.current_temperature, Some(19.5));
    }

    #[tokio::test]
    async fn should_process_state_changes_in_order() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        let handle = spawn(&home, &store, ZoneRuntimeState::default());
        handle.set_hvac_mode(HvacMode::Heat).await.unwrap();

        assert!(handle.notify(StateChange::new(SENSOR, None, EntityState::from(20.0))));
        let status = handle.status().await.unwrap();

        assert!(status.is_heating);
        assert_eq!(home.commands_for(RELAY), vec![true]);
    }

    #[tokio::test]
    async fn should_persist_snapshot_when_commands_change_state() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        let handle = spawn(&home, &store, ZoneRuntimeState::default());

        handle.set_preset_mode(PresetMode::Comfort).await.unwrap();

        let snapshot = store.get("living").unwrap();
        assert_eq!(snapshot.preset_mode, PresetMode::Comfort);
        assert_eq!(snapshot.hvac_mode, HvacMode::Heat);
        assert!((snapshot.target_temperature - 22.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_not_persist_unchanged_state() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        let handle = spawn(&home, &store, ZoneRuntimeState::default());

        handle.status().await.unwrap();

        assert!(store.get("living").is_none());
    }

    #[tokio::test]
    async fn should_surface_validation_errors_to_caller() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        let handle = spawn(&home, &store, ZoneRuntimeState::default());

        let result = handle.set_target_temperature(2.0).await;

        assert!(matches!(result, Err(SmartHeatError::Validation(_))));
    }

    #[tokio::test]
    async fn should_return_state_on_shutdown_and_reject_later_requests() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        let handle = spawn(&home, &store, ZoneRuntimeState::default());
        handle.set_target_temperature(23.5).await.unwrap();
        let other = handle.clone();

        let state = handle.shutdown(false).await.unwrap();

        assert!((state.target_temperature - 23.5).abs() < f64::EPSILON);
        assert!(matches!(
            other.status().await,
            Err(SmartHeatError::NotFound(_))
        ));
        assert!(!other.notify(StateChange::new(SENSOR, None, EntityState::from(20.0))));
    }

    #[tokio::test]
    async fn should_release_relays_on_shutdown_with_release() {
        let home = Arc::new(FakeHome::default());
        let store = Arc::new(InMemorySnapshotStore::default());
        home.set(SENSOR, 19.0);
        let handle = spawn(&home, &store, ZoneRuntimeState::default());
        handle.set_hvac_mode(HvacMode::Heat).await.unwrap();

        let state = handle.shutdown(true).await.unwrap();

        assert!(!state.is_heating);
        assert_eq!(home.commands_for(RELAY), vec![true, false]);
    }
}
