//! # smartheatd: smartheat daemon
//!
//! Composition root that wires all adapters together and starts the
//! heating controller.
//!
//! ## Responsibilities
//! - Parse configuration (`smartheat.toml`, env vars)
//! - Initialize the tracing subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the virtual home, the boiler coordinator and the supervisor
//! - Start one zone actor per configured zone and route bus events to them
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use smartheat_adapter_http_axum::state::AppState;
use smartheat_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteSnapshotStore};
use smartheat_adapter_virtual::{SimulatedRoom, ThermalModel, VirtualHome, spawn_simulation};
use smartheat_app::boiler::BoilerCoordinator;
use smartheat_app::event_bus::InProcessEventBus;
use smartheat_app::ports::SystemClock;
use smartheat_app::supervisor::HeatingSupervisor;
use smartheat_app::zone_controller::ZonePorts;
use smartheat_domain::entity::EntityState;
use smartheat_domain::zone::ZoneSettings;

use crate::config::{Config, SimulationConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let store = SqliteSnapshotStore::new(db.pool().clone());

    // Event bus and virtual home
    let bus = Arc::new(InProcessEventBus::new(256));
    let home = Arc::new(VirtualHome::new(Arc::clone(&bus)));

    let simulation = if config.simulation.enabled {
        if let (Some(common), Some(value)) = (&config.common, config.simulation.outdoor_temperature)
            && let Some(outdoor) = &common.outdoor_sensor
        {
            home.seed(outdoor, value);
        }
        for door in config.zones.iter().flat_map(|zone| &zone.door_sensors) {
            home.seed(door, EntityState::Off);
        }
        let rooms = simulated_rooms(&config.zones, &config.simulation);
        Some(spawn_simulation(
            Arc::clone(&home),
            rooms,
            ThermalModel::default(),
            Duration::from_secs(config.simulation.period_secs),
        ))
    } else {
        None
    };

    // Heating
    let boiler = Arc::new(BoilerCoordinator::new(Arc::clone(&home)));
    let ports = ZonePorts {
        reader: Arc::clone(&home),
        actuator: Arc::clone(&home),
        clock: SystemClock,
    };
    let supervisor = Arc::new(HeatingSupervisor::new(ports, boiler, store));

    let events = bus.subscribe();
    if config.zones.is_empty() {
        tracing::warn!("no zone configured");
    } else {
        supervisor.start(&config.heating()).await?;
    }
    let router_task = {
        let supervisor = Arc::clone(&supervisor);
        tokio::spawn(async move { supervisor.run(events).await })
    };

    // HTTP
    let app = smartheat_adapter_http_axum::router::build(AppState::from_arc(Arc::clone(
        &supervisor,
    )));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "smartheatd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(simulation) = simulation {
        simulation.abort();
    }
    supervisor.shutdown().await;
    router_task.abort();
    tracing::info!("smartheatd stopped");

    Ok(())
}

/// One simulated room per zone, driven by the zone's sensor and relays.
fn simulated_rooms(zones: &[ZoneSettings], simulation: &SimulationConfig) -> Vec<SimulatedRoom> {
    zones
        .iter()
        .filter_map(|zone| {
            zone.sensor.as_ref().map(|sensor| SimulatedRoom {
                sensor: sensor.clone(),
                relays: zone.relays.clone(),
                initial_temperature: simulation.initial_temperature,
            })
        })
        .collect()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received terminate signal, shutting down"),
    }
}
