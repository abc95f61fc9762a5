//! Background task moving simulated room temperatures.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use smartheat_app::ports::StateChangePublisher;
use smartheat_domain::entity::EntityState;

use crate::VirtualHome;
use crate::devices::ThermalModel;

/// A room whose sensor is driven by the thermal model.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRoom {
    pub sensor: String,
    pub relays: Vec<String>,
    pub initial_temperature: f64,
}

impl<P: StateChangePublisher + Send + Sync> VirtualHome<P> {
    /// Seed the sensors of `rooms` with their initial temperature and their
    /// relays with `off`, leaving already known entities alone.
    pub fn seed_rooms(&self, rooms: &[SimulatedRoom]) {
        for room in rooms {
            if self.state(&room.sensor).is_none() {
                self.seed(&room.sensor, room.initial_temperature);
            }
            for relay in &room.relays {
                if self.state(relay).is_none() {
                    self.seed(relay, EntityState::Off);
                }
            }
        }
    }

    /// Advance every room by one step of `model` and publish the readings.
    pub async fn simulate_step(&self, rooms: &[SimulatedRoom], model: &ThermalModel) {
        for room in rooms {
            let heating = room
                .relays
                .iter()
                .any(|relay| self.state(relay).is_some_and(|state| state.is_on()));
            let current = self
                .state(&room.sensor)
                .and_then(|state| state.temperature())
                .unwrap_or(room.initial_temperature);
            let next = model.step(current, heating);
            if let Err(err) = self.set_state(&room.sensor, next).await {
                tracing::warn!(entity_id = %room.sensor, error = ?err, "failed to publish simulated reading");
            }
        }
    }
}

/// Seed `rooms` and spawn a task stepping them every `period`.
pub fn spawn_simulation<P>(
    home: Arc<VirtualHome<P>>,
    rooms: Vec<SimulatedRoom>,
    model: ThermalModel,
    period: Duration,
) -> JoinHandle<()>
where
    P: StateChangePublisher + Send + Sync + 'static,
{
    home.seed_rooms(&rooms);
    tracing::info!(rooms = rooms.len(), ?period, "virtual room simulation started");
    tokio::spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            home.simulate_step(&rooms, &model).await;
        }
    })
}
