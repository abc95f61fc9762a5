//! Thermostat offset: compensation for sensors mounted on the radiator.

use serde::{Deserialize, Serialize};

/// Where the zone's temperature sensor is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermostatType {
    /// Measures ambient room temperature.
    #[default]
    Wall,
    /// Sits on or near the radiator body and reads hotter than the room.
    Radiator,
}

/// Target temperature used for comparisons against the sensor reading.
///
/// The stored target is never modified; only comparisons use this value.
#[must_use]
pub fn adjusted_target(thermostat: ThermostatType, target: f64, offset: f64) -> f64 {
    match thermostat {
        ThermostatType::Wall => target,
        ThermostatType::Radiator => target + offset,
    }
}
