//! # smartheat-app
//!
//! Application layer: zone controllers, boiler coordination and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StateReader`: current state of host entities
//!   - `SwitchActuator`: switch relays on and off
//!   - `Clock`: local time of day for schedules
//!   - `SnapshotStore`: persist restorable zone state
//!   - `StateChangePublisher`: publish host state changes
//! - Define the **driving/inbound port** `HeatingControl` used by the HTTP API
//! - Run one **zone controller** per zone as an actor, plus the shared
//!   **boiler coordinator** and the **heating supervisor** wiring them up
//! - Provide **in-process infrastructure** (event bus, schedule timer) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `smartheat-domain` only (plus `tokio` for tasks, channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod boiler;
pub mod event_bus;
pub mod ports;
pub mod schedule_timer;
pub mod supervisor;
pub mod zone_actor;
pub mod zone_controller;

#[cfg(test)]
mod testing;
