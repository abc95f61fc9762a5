//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the heating core and the host platform.
//! They are defined here (in `app`) so that both the controllers and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod clock;
pub mod control;
pub mod event_bus;
pub mod home;
pub mod snapshot_store;

pub use clock::{Clock, SystemClock};
pub use control::HeatingControl;
pub use event_bus::StateChangePublisher;
pub use home::{StateReader, SwitchActuator};
pub use snapshot_store::SnapshotStore;
