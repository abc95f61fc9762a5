//! Zone: one independently controlled heating area.
//!
//! A zone is described by an immutable [`ZoneConfig`] (built from the
//! configuration snapshot), carries a mutable [`ZoneRuntimeState`] owned by
//! exactly one controller, and exposes a [`ZoneStatus`] plus a persisted
//! [`ZoneSnapshot`].

mod config;
mod mode;
mod runtime;

pub use config::{
    CommonSettings, EntityRole, HeatingConfig, PresetTemperatures, ZoneConfig, ZoneSettings,
};
pub use mode::{HvacAction, HvacMode, PresetMode};
pub use runtime::{
    DEFAULT_TARGET_TEMP, MAX_TEMP, MIN_TEMP, ZoneRuntimeState, ZoneSnapshot, ZoneStatus,
    validate_target,
};
