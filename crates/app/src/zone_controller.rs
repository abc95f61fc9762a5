//! Zone controller: the heating decision logic of one zone.
//!
//! The controller owns the zone's [`ZoneRuntimeState`] and is driven by a
//! single task (see [`crate::zone_actor`]), so its methods take `&mut self`
//! and never need a lock. Every trigger ends in [`ZoneController::evaluate_heating`],
//! which is idempotent: relays and boiler are only commanded on a change of
//! the believed heating state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;

use smartheat_domain::entity::EntityState;
use smartheat_domain::error::SmartHeatError;
use smartheat_domain::event::StateChange;
use smartheat_domain::hysteresis::{self, HeatingMode};
use smartheat_domain::thermostat;
use smartheat_domain::zone::{
    EntityRole, HvacMode, PresetMode, ZoneConfig, ZoneRuntimeState, ZoneStatus, validate_target,
};

use crate::boiler::BoilerCoordinator;
use crate::ports::{Clock, StateReader, SwitchActuator};
use crate::schedule_timer::{SCHEDULE_TICK, ScheduleTimer};
use crate::zone_actor::{MailboxListener, ZoneMessage};

/// Host-facing collaborators of a zone.
#[derive(Debug, Clone)]
pub struct ZonePorts<S, A, C> {
    pub reader: S,
    pub actuator: A,
    pub clock: C,
}

pub struct ZoneController<S, A, C> {
    config: Arc<ZoneConfig>,
    state: ZoneRuntimeState,
    ports: ZonePorts<S, A, C>,
    boiler: Arc<BoilerCoordinator<A>>,
    mailbox: WeakUnboundedSender<ZoneMessage>,
    timer: ScheduleTimer,
    tick_period: Duration,
}

impl<S, A, C> ZoneController<S, A, C>
where
    S: StateReader + Send + Sync,
    A: SwitchActuator + Send + Sync,
    C: Clock,
{
    /// Build a controller around a (default or restored) runtime state.
    ///
    /// `mailbox` is the controller's own mailbox; it feeds the schedule
    /// timer and piggyback notifications.
    pub fn new(
        config: Arc<ZoneConfig>,
        state: ZoneRuntimeState,
        ports: ZonePorts<S, A, C>,
        boiler: Arc<BoilerCoordinator<A>>,
        mailbox: WeakUnboundedSender<ZoneMessage>,
    ) -> Self {
        Self {
            config,
            state,
            ports,
            boiler,
            mailbox,
            timer: ScheduleTimer::default(),
            tick_period: SCHEDULE_TICK,
        }
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn state(&self) -> &ZoneRuntimeState {
        &self.state
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Bring the zone up: register with the boiler, read the current sensor
    /// values, adopt the actual relay state, resume the schedule and evaluate.
    pub async fn start(&mut self) {
        let config = Arc::clone(&self.config);
        for (index, err) in config.schedule.malformed_blocks() {
            tracing::warn!(zone = %config.name, block = index, error = %err, "ignoring malformed schedule block");
        }

        let listener = Arc::new(MailboxListener::new(self.mailbox.clone()));
        self.boiler.register_zone(&config.name, listener).await;

        self.state.current_temperature = self.read_temperature(&config.sensor).await;
        if config.adaptive_hysteresis
            && let Some(outdoor) = &config.outdoor_sensor
        {
            self.state.outdoor_temperature = self.read_temperature(outdoor).await;
        }

        self.reconcile_relays().await;
        if self.state.preset_mode == PresetMode::Auto {
            self.apply_schedule();
            self.start_timer();
        }
        tracing::info!(
            zone = %config.name,
            hvac_mode = %self.state.hvac_mode,
            preset = %self.state.preset_mode,
            target = self.state.target_temperature,
            "zone started"
        );
        self.evaluate_heating().await;
    }

    /// React to a change of one of the zone's entities.
    pub async fn handle_state_change(&mut self, change: &StateChange) {
        match self.config.role_of(&change.entity_id) {
            Some(EntityRole::Sensor) => self.on_temperature(&change.new).await,
            Some(EntityRole::Relay) => self.reconcile_relays().await,
            Some(EntityRole::Door) => {
                tracing::debug!(zone = %self.config.name, entity_id = %change.entity_id, state = %change.new, "door changed");
                self.evaluate_heating().await;
            }
            Some(EntityRole::Outdoor) => self.on_outdoor(&change.new).await,
            None => {}
        }
    }

    async fn on_temperature(&mut self, reading: &EntityState) {
        let Some(current) = reading.temperature() else {
            tracing::debug!(zone = %self.config.name, state = %reading, "discarding invalid temperature reading");
            return;
        };
        self.state.current_temperature = Some(current);

        if current >= self.config.overheat_temp && self.state.is_heating {
            tracing::warn!(
                zone = %self.config.name,
                current,
                limit = self.config.overheat_temp,
                "overheat protection triggered"
            );
            self.set_heating(false, "overheat").await;
            return;
        }

        if self.state.hvac_mode == HvacMode::Off
            && self.adjusted_target() - current > self.effective_hysteresis()
            && !self.any_door_open().await
        {
            tracing::info!(
                zone = %self.config.name,
                current,
                target = self.adjusted_target(),
                "temperature dropped below target, switching hvac to heat"
            );
            self.state.hvac_mode = HvacMode::Heat;
        }
        self.evaluate_heating().await;
    }

    async fn on_outdoor(&mut self, reading: &EntityState) {
        if !self.config.adaptive_hysteresis {
            return;
        }
        let Some(outdoor) = reading.temperature() else {
            tracing::debug!(zone = %self.config.name, state = %reading, "discarding invalid outdoor reading");
            return;
        };
        self.state.outdoor_temperature = Some(outdoor);
        self.evaluate_heating().await;
    }

    /// Adopt the actual relay state when it diverges from the believed one
    /// (a relay switched by hand). Relays are not commanded back.
    async fn reconcile_relays(&mut self) {
        if self.config.relays.is_empty() {
            return;
        }
        let config = Arc::clone(&self.config);
        let mut actual = false;
        let mut indeterminate = false;
        for relay in &config.relays {
            match self.ports.reader.get_state(relay).await {
                Ok(Some(EntityState::On)) => actual = true,
                Ok(Some(EntityState::Off)) => {}
                Ok(_) => {
                    tracing::debug!(zone = %config.name, entity_id = %relay, "relay state unknown");
                    indeterminate = true;
                }
                Err(err) => {
                    tracing::warn!(zone = %config.name, entity_id = %relay, error = ?err, "failed to read relay state");
                    indeterminate = true;
                }
            }
        }
        // one relay on settles the OR; otherwise an unknown relay leaves it open
        if !actual && indeterminate {
            tracing::debug!(zone = %config.name, "relay states indeterminate, skipping reconciliation");
            return;
        }
        if actual == self.state.is_heating {
            return;
        }

        tracing::warn!(
            zone = %config.name,
            believed = self.state.is_heating,
            actual,
            "relay state diverged, following manual override"
        );
        self.state.is_heating = actual;
        if actual {
            self.boiler
                .turn_on(&config.name, config.boiler_relay.as_deref())
                .await;
        } else {
            self.boiler.turn_off(&config.name).await;
        }
    }

    /// Periodic re-resolution of the schedule while in `auto`.
    pub async fn on_schedule_tick(&mut self) {
        if self.state.preset_mode != PresetMode::Auto {
            tracing::debug!(zone = %self.config.name, "ignoring schedule tick outside auto preset");
            return;
        }
        self.apply_schedule();
        self.evaluate_heating().await;
    }

    /// The boiler was just started by `initiator`: heat along if this zone
    /// is below its target.
    pub async fn piggyback_check(&mut self, initiator: &str) {
        if self.state.hvac_mode == HvacMode::Off || self.state.is_heating {
            return;
        }
        let Some(current) = self.state.current_temperature else {
            return;
        };
        if self.any_door_open().await {
            return;
        }
        let target = self.adjusted_target();
        if current < target {
            tracing::info!(zone = %self.config.name, initiator = %initiator, current, target, "piggybacking on running boiler");
            self.set_heating(true, "piggyback").await;
        }
    }

    /// # Errors
    ///
    /// Returns a validation error when `value` is outside the allowed range;
    /// the zone is left untouched in that case.
    pub async fn set_target_temperature(&mut self, value: f64) -> Result<(), SmartHeatError> {
        let value = validate_target(value)?;
        self.state.target_temperature = value;
        if self.state.preset_mode != PresetMode::Manual {
            tracing::info!(zone = %self.config.name, from = %self.state.preset_mode, "manual target set, switching preset to manual");
            self.state.preset_mode = PresetMode::Manual;
            self.timer.cancel();
        }
        self.evaluate_heating().await;
        Ok(())
    }

    pub async fn set_hvac_mode(&mut self, mode: HvacMode) {
        tracing::info!(zone = %self.config.name, hvac_mode = %mode, "hvac mode set");
        self.state.hvac_mode = mode;
        self.evaluate_heating().await;
    }

    pub async fn set_preset_mode(&mut self, preset: PresetMode) {
        if self.state.hvac_mode == HvacMode::Off {
            tracing::info!(zone = %self.config.name, "preset selected while off, switching hvac to heat");
            self.state.hvac_mode = HvacMode::Heat;
        }
        self.state.preset_mode = preset;
        match preset {
            PresetMode::Auto => {
                self.apply_schedule();
                self.start_timer();
            }
            fixed if fixed.is_fixed_target() => {
                if let Some(target) = self.config.presets.target_for(fixed) {
                    self.state.target_temperature = target;
                }
                self.timer.cancel();
            }
            _ => self.timer.cancel(),
        }
        tracing::info!(zone = %self.config.name, preset = %preset, target = self.state.target_temperature, "preset set");
        self.evaluate_heating().await;
    }

    /// Decide whether the zone should heat and actuate accordingly.
    pub async fn evaluate_heating(&mut self) {
        if self.state.hvac_mode == HvacMode::Off {
            self.set_heating(false, "hvac off").await;
            return;
        }
        let Some(current) = self.state.current_temperature else {
            tracing::debug!(zone = %self.config.name, "no temperature yet, skipping evaluation");
            return;
        };
        if self.any_door_open().await {
            self.set_heating(false, "door open").await;
            return;
        }
        if current >= self.config.overheat_temp {
            self.set_heating(false, "overheat").await;
            return;
        }

        let target = self.adjusted_target();
        let hysteresis = self.effective_hysteresis();
        let diff = target - current;
        tracing::trace!(zone = %self.config.name, current, target, hysteresis, "evaluating");

        match self.config.heating_mode {
            HeatingMode::Underfloor => {
                self.set_heating(current < target, "underfloor threshold").await;
            }
            HeatingMode::Radiator if diff > hysteresis => {
                self.set_heating(true, "below target").await;
            }
            HeatingMode::Radiator if diff < -hysteresis => {
                self.set_heating(false, "target reached").await;
            }
            HeatingMode::Radiator => {}
        }
    }

    #[must_use]
    pub fn status(&self) -> ZoneStatus {
        ZoneStatus {
            name: self.config.name.clone(),
            current_temperature: self.state.current_temperature,
            target_temperature: self.state.target_temperature,
            hvac_mode: self.state.hvac_mode,
            preset_mode: self.state.preset_mode,
            action: self.state.action(),
            is_heating: self.state.is_heating,
            effective_hysteresis: self.effective_hysteresis(),
            adjusted_target: self.adjusted_target(),
            outdoor_temperature: self.state.outdoor_temperature,
            heating_mode: self.config.heating_mode,
            thermostat_type: self.config.thermostat_type,
        }
    }

    /// Stop the timer and leave the boiler registry. With `release`, the
    /// zone also stops heating. Returns the state to carry into a rebuilt
    /// controller.
    pub async fn teardown(mut self, release: bool) -> ZoneRuntimeState {
        self.timer.cancel();
        self.boiler.unregister_zone(&self.config.name).await;
        if release {
            self.set_heating(false, "zone removed").await;
        }
        tracing::info!(zone = %self.config.name, release, "zone stopped");
        self.state
    }

    fn adjusted_target(&self) -> f64 {
        thermostat::adjusted_target(
            self.config.thermostat_type,
            self.state.target_temperature,
            self.config.temp_offset,
        )
    }

    fn effective_hysteresis(&self) -> f64 {
        hysteresis::effective_hysteresis(
            self.config.heating_mode,
            self.config.base_hysteresis,
            self.config.adaptive_hysteresis,
            self.state.outdoor_temperature,
        )
    }

    fn apply_schedule(&mut self) {
        let now = self.ports.clock.time_of_day();
        match self.config.schedule.resolve(now) {
            Some(target) => {
                if (target - self.state.target_temperature).abs() > f64::EPSILON {
                    tracing::info!(zone = %self.config.name, time = %now, target, "schedule target applied");
                }
                self.state.target_temperature = target;
            }
            None => {
                tracing::warn!(zone = %self.config.name, time = %now, "no schedule block matches, keeping target");
            }
        }
    }

    fn start_timer(&mut self) {
        if self.config.schedule.is_empty() {
            tracing::debug!(zone = %self.config.name, "empty schedule, timer not started");
            return;
        }
        self.timer
            .start(&self.config.name, self.tick_period, self.mailbox.clone());
    }

    async fn read_temperature(&self, entity_id: &str) -> Option<f64> {
        match self.ports.reader.get_state(entity_id).await {
            Ok(state) => state.and_then(|state| state.temperature()),
            Err(err) => {
                tracing::warn!(zone = %self.config.name, entity_id = %entity_id, error = ?err, "failed to read sensor");
                None
            }
        }
    }

    /// A read failure counts as closed.
    async fn any_door_open(&self) -> bool {
        for door in &self.config.door_sensors {
            match self.ports.reader.get_state(door).await {
                Ok(Some(state)) if state.is_on() => return true,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(zone = %self.config.name, entity_id = %door, error = ?err, "failed to read door sensor");
                }
            }
        }
        false
    }

    async fn set_heating(&mut self, enable: bool, reason: &str) {
        if self.state.is_heating == enable {
            return;
        }
        self.state.is_heating = enable;

        let config = Arc::clone(&self.config);
        for relay in &config.relays {
            if let Err(err) = self.ports.actuator.set_switch(relay, enable).await {
                tracing::error!(zone = %config.name, entity_id = %relay, on = enable, error = ?err, "failed to switch relay");
            }
        }
        if enable {
            self.boiler
                .turn_on(&config.name, config.boiler_relay.as_deref())
                .await;
        } else {
            self.boiler.turn_off(&config.name).await;
        }
        tracing::info!(zone = %config.name, heating = enable, reason, "heating switched");
    }
}
