//! Zone runtime state, persisted snapshot and exposed status.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hysteresis::HeatingMode;
use crate::thermostat::ThermostatType;
use crate::time::{Timestamp, now};

use super::mode::{HvacAction, HvacMode, PresetMode};

pub const DEFAULT_TARGET_TEMP: f64 = 21.0;
pub const MIN_TEMP: f64 = 5.0;
pub const MAX_TEMP: f64 = 30.0;

/// Check that a user-supplied target lies within [`MIN_TEMP`]..=[`MAX_TEMP`].
///
/// # Errors
///
/// Returns [`ValidationError::TemperatureOutOfRange`] otherwise (NaN included).
pub fn validate_target(value: f64) -> Result<f64, ValidationError> {
    if (MIN_TEMP..=MAX_TEMP).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::TemperatureOutOfRange {
            value,
            min: MIN_TEMP,
            max: MAX_TEMP,
        })
    }
}

/// Mutable state owned by exactly one zone controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRuntimeState {
    pub current_temperature: Option<f64>,
    pub target_temperature: f64,
    pub hvac_mode: HvacMode,
    pub preset_mode: PresetMode,
    /// Believed actuation state, reconciled against the relays.
    pub is_heating: bool,
    pub outdoor_temperature: Option<f64>,
}

impl Default for ZoneRuntimeState {
    fn default() -> Self {
        Self {
            current_temperature: None,
            target_temperature: DEFAULT_TARGET_TEMP,
            hvac_mode: HvacMode::Off,
            preset_mode: PresetMode::Manual,
            is_heating: false,
            outdoor_temperature: None,
        }
    }
}

impl ZoneRuntimeState {
    /// Overwrite the persisted subset with a previously saved snapshot.
    pub fn restore(&mut self, snapshot: &ZoneSnapshot) {
        self.target_temperature = snapshot.target_temperature;
        self.hvac_mode = snapshot.hvac_mode;
        self.preset_mode = snapshot.preset_mode;
    }

    /// Capture the persisted subset for `zone`.
    #[must_use]
    pub fn snapshot(&self, zone: &str) -> ZoneSnapshot {
        ZoneSnapshot {
            zone: zone.to_string(),
            target_temperature: self.target_temperature,
            hvac_mode: self.hvac_mode,
            preset_mode: self.preset_mode,
            updated_at: now(),
        }
    }

    #[must_use]
    pub fn action(&self) -> HvacAction {
        HvacAction::derive(self.hvac_mode, self.is_heating)
    }
}

/// The restorable part of a zone's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub zone: String,
    pub target_temperature: f64,
    pub hvac_mode: HvacMode,
    pub preset_mode: PresetMode,
    pub updated_at: Timestamp,
}

/// Everything a zone exposes to the platform glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub name: String,
    pub current_temperature: Option<f64>,
    /// Unadjusted target, as set by the user, a preset or the schedule.
    pub target_temperature: f64,
    pub hvac_mode: HvacMode,
    pub preset_mode: PresetMode,
    pub action: HvacAction,
    pub is_heating: bool,
    pub effective_hysteresis: f64,
    pub adjusted_target: f64,
    pub outdoor_temperature: Option<f64>,
    pub heating_mode: HeatingMode,
    pub thermostat_type: ThermostatType,
}
