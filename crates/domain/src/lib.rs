//! # smartheat-domain
//!
//! Pure domain model for the smartheat multi-zone heating controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, time-of-day parsing
//! - Define **entity states** and **state-change events** as seen from the
//!   host platform (sensors, relays, door contacts)
//! - Define **schedules** and their resolution against a time of day
//! - Define the **hysteresis policy** and the **thermostat offset** adapter
//! - Define the observable **boiler** status shared by all zones
//! - Define **zones**: immutable configuration, runtime state, persisted
//!   snapshot and exposed status
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod boiler;
pub mod entity;
pub mod event;
pub mod hysteresis;
pub mod schedule;
pub mod thermostat;
pub mod zone;
