//! Entity: an observable/controllable thing owned by the host platform.
//!
//! The heating core never owns entities; it only refers to them by their
//! string id (`sensor.living_temperature`, `switch.boiler`, …) and reads
//! their [`EntityState`].

mod state;

pub use state::EntityState;
