//! Entity state: the raw state value reported by the host platform.

use serde::{Deserialize, Serialize};

/// State of a host entity as reported by the platform.
///
/// Switches and binary sensors report `on` / `off`; temperature sensors
/// report a numeric string. Everything else is kept verbatim in
/// [`Value`](Self::Value) so that it can be validated at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
    Value(String),
}

impl EntityState {
    /// Whether the entity reports `on` (relay energized, door open, …).
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Interpret the state as a temperature reading.
    ///
    /// Returns `None` for sentinels (`unknown`, `unavailable`), switch
    /// states, non-numeric payloads and non-finite numbers.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Self::Value(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl From<String> for EntityState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            "unknown" => Self::Unknown,
            "unavailable" => Self::Unavailable,
            _ => Self::Value(raw),
        }
    }
}

impl From<&str> for EntityState {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<f64> for EntityState {
    fn from(value: f64) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<EntityState> for String {
    fn from(state: EntityState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::Value(raw) => f.write_str(raw),
        }
    }
}
