//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHeatError`] via `#[from]` at port boundaries.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum SmartHeatError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("actuation error")]
    Actuation(#[from] ActuationError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("zone {0:?} is declared more than once")]
    DuplicateZone(String),

    #[error("zone {0:?} has no temperature sensor")]
    MissingSensor(String),

    #[error("common settings are missing")]
    MissingCommonSettings,

    #[error("hysteresis must be greater than zero, got {0}")]
    InvalidHysteresis(f64),

    #[error("thermostat offset must not be negative, got {0}")]
    NegativeOffset(f64),

    #[error("a schedule holds at most {max} blocks, got {actual}")]
    TooManyBlocks { max: usize, actual: usize },

    #[error("temperature {value} is outside {min}..={max}")]
    TemperatureOutOfRange { value: f64, min: f64, max: f64 },

    #[error("unknown preset mode {0:?}")]
    UnknownPreset(String),

    #[error("unknown hvac mode {0:?}")]
    UnknownHvacMode(String),
}

/// The requested item does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A switch command could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to switch {entity_id} (on = {on}): {reason}")]
pub struct ActuationError {
    pub entity_id: String,
    pub on: bool,
    pub reason: String,
}
