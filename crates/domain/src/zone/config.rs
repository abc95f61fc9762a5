//! Zone configuration: raw settings from the configuration snapshot and the
//! validated, immutable [`ZoneConfig`] built from them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hysteresis::HeatingMode;
use crate::schedule::{Schedule, ScheduleBlock};
use crate::thermostat::ThermostatType;

use super::mode::PresetMode;

const DEFAULT_HYSTERESIS: f64 = 0.3;
const DEFAULT_OVERHEAT_TEMP: f64 = 28.0;

/// Fixed targets for the comfort / eco / away presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetTemperatures {
    pub comfort: f64,
    pub eco: f64,
    pub away: f64,
}

impl Default for PresetTemperatures {
    fn default() -> Self {
        Self {
            comfort: 22.0,
            eco: 19.0,
            away: 16.0,
        }
    }
}

impl PresetTemperatures {
    /// Fixed target for `preset`, or `None` for `auto` and `manual`.
    #[must_use]
    pub fn target_for(&self, preset: PresetMode) -> Option<f64> {
        match preset {
            PresetMode::Comfort => Some(self.comfort),
            PresetMode::Eco => Some(self.eco),
            PresetMode::Away => Some(self.away),
            PresetMode::Auto | PresetMode::Manual => None,
        }
    }
}

/// Settings shared by every zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSettings {
    /// The one boiler relay shared by all zones.
    pub boiler_relay: Option<String>,
    pub hysteresis: f64,
    pub overheat_temp: f64,
    pub outdoor_sensor: Option<String>,
    pub adaptive_hysteresis: bool,
    pub presets: PresetTemperatures,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            boiler_relay: None,
            hysteresis: DEFAULT_HYSTERESIS,
            overheat_temp: DEFAULT_OVERHEAT_TEMP,
            outdoor_sensor: None,
            adaptive_hysteresis: false,
            presets: PresetTemperatures::default(),
        }
    }
}

/// Per-zone settings as entered by the user.
///
/// `None` overrides fall back to the [`CommonSettings`] value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    pub name: String,
    pub sensor: Option<String>,
    pub relays: Vec<String>,
    pub door_sensors: Vec<String>,
    pub heating_mode: HeatingMode,
    pub thermostat_type: ThermostatType,
    pub temp_offset: f64,
    pub schedule: Vec<ScheduleBlock>,
    pub hysteresis: Option<f64>,
    pub overheat_temp: Option<f64>,
    pub outdoor_sensor: Option<String>,
    pub adaptive_hysteresis: Option<bool>,
}

/// Complete configuration snapshot: common settings plus all zones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatingConfig {
    pub common: Option<CommonSettings>,
    pub zones: Vec<ZoneSettings>,
}

impl HeatingConfig {
    /// Validate every zone against the common settings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCommonSettings`] when there are no
    /// common settings, [`ValidationError::DuplicateZone`] when two zones
    /// share a name, or the first per-zone validation failure.
    pub fn zone_configs(&self) -> Result<Vec<ZoneConfig>, ValidationError> {
        let common = self
            .common
            .as_ref()
            .ok_or(ValidationError::MissingCommonSettings)?;

        let mut seen = HashSet::new();
        self.zones
            .iter()
            .map(|settings| {
                if !seen.insert(settings.name.as_str()) {
                    return Err(ValidationError::DuplicateZone(settings.name.clone()));
                }
                ZoneConfig::from_settings(settings, common)
            })
            .collect()
    }
}

/// What a referenced entity means to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Sensor,
    Relay,
    Door,
    Outdoor,
}

/// Validated, immutable configuration of one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneConfig {
    pub name: String,
    pub sensor: String,
    pub relays: Vec<String>,
    pub door_sensors: Vec<String>,
    pub outdoor_sensor: Option<String>,
    pub heating_mode: HeatingMode,
    pub thermostat_type: ThermostatType,
    pub temp_offset: f64,
    pub schedule: Schedule,
    pub base_hysteresis: f64,
    pub overheat_temp: f64,
    pub adaptive_hysteresis: bool,
    pub boiler_relay: Option<String>,
    pub presets: PresetTemperatures,
}

impl ZoneConfig {
    /// Merge zone settings with the common settings and check invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name is empty, the sensor is
    /// missing, the hysteresis is not positive, the offset is negative or
    /// the schedule has too many blocks.
    pub fn from_settings(
        settings: &ZoneSettings,
        common: &CommonSettings,
    ) -> Result<Self, ValidationError> {
        if settings.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let sensor = settings
            .sensor
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::MissingSensor(settings.name.clone()))?;

        let base_hysteresis = settings.hysteresis.unwrap_or(common.hysteresis);
        if base_hysteresis.is_nan() || base_hysteresis <= 0.0 {
            return Err(ValidationError::InvalidHysteresis(base_hysteresis));
        }
        if settings.temp_offset.is_nan() || settings.temp_offset < 0.0 {
            return Err(ValidationError::NegativeOffset(settings.temp_offset));
        }

        Ok(Self {
            name: settings.name.clone(),
            sensor,
            relays: settings.relays.clone(),
            door_sensors: settings.door_sensors.clone(),
            outdoor_sensor: settings
                .outdoor_sensor
                .clone()
                .or_else(|| common.outdoor_sensor.clone()),
            heating_mode: settings.heating_mode,
            thermostat_type: settings.thermostat_type,
            temp_offset: settings.temp_offset,
            schedule: Schedule::new(settings.schedule.clone())?,
            base_hysteresis,
            overheat_temp: settings.overheat_temp.unwrap_or(common.overheat_temp),
            adaptive_hysteresis: settings
                .adaptive_hysteresis
                .unwrap_or(common.adaptive_hysteresis),
            boiler_relay: common.boiler_relay.clone().filter(|s| !s.is_empty()),
            presets: common.presets,
        })
    }

    /// The role `entity_id` plays in this zone, if any.
    #[must_use]
    pub fn role_of(&self, entity_id: &str) -> Option<EntityRole> {
        if self.sensor == entity_id {
            Some(EntityRole::Sensor)
        } else if self.relays.iter().any(|r| r == entity_id) {
            Some(EntityRole::Relay)
        } else if self.door_sensors.iter().any(|d| d == entity_id) {
            Some(EntityRole::Door)
        } else if self.outdoor_sensor.as_deref() == Some(entity_id) {
            Some(EntityRole::Outdoor)
        } else {
            None
        }
    }

    /// Every entity this zone listens to.
    pub fn watched_entities(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.sensor.as_str())
            .chain(self.relays.iter().map(String::as_str))
            .chain(self.door_sensors.iter().map(String::as_str))
            .chain(self.outdoor_sensor.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common() -> CommonSettings {
        CommonSettings {
            boiler_relay: Some("switch.boiler".to_string()),
            outdoor_sensor: Some("sensor.outdoor".to_string()),
            ..CommonSettings::default()
        }
    }

    fn settings(name: &str) -> ZoneSettings {
        ZoneSettings {
            name: name.to_string(),
            sensor: Some(format!("sensor.{name}_temperature")),
            relays: vec![format!("switch.{name}_valve")],
            door_sensors: vec![format!("binary_sensor.{name}_window")],
            ..ZoneSettings::default()
        }
    }

    #[test]
    fn should_inherit_common_values_when_zone_does_not_override() {
        let config = ZoneConfig::from_settings(&settings("living"), &common()).unwrap();
        assert!((config.base_hysteresis - 0.3).abs() < f64::EPSILON);
        assert!((config.overheat_temp - 28.0).abs() < f64::EPSILON);
        assert_eq!(config.outdoor_sensor.as_deref(), Some("sensor.outdoor"));
        assert_eq!(config.boiler_relay.as_deref(), Some("switch.boiler"));
        assert!(!config.adaptive_hysteresis);
    }

    #[test]
    fn should_prefer_zone_overrides() {
        let mut zone = settings("bath");
        zone.hysteresis = Some(0.5);
        zone.adaptive_hysteresis = Some(true);
        zone.overheat_temp = Some(26.0);
        let config = ZoneConfig::from_settings(&zone, &common()).unwrap();
        assert!((config.base_hysteresis - 0.5).abs() < f64::EPSILON);
        assert!((config.overheat_temp - 26.0).abs() < f64::EPSILON);
        assert!(config.adaptive_hysteresis);
    }

    #[test]
    fn should_reject_empty_name() {
        let err = ZoneConfig::from_settings(&settings(""), &common()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn should_reject_missing_sensor() {
        let mut zone = settings("hall");
        zone.sensor = None;
        let err = ZoneConfig::from_settings(&zone, &common()).unwrap_err();
        assert_eq!(err, ValidationError::MissingSensor("hall".to_string()));
    }

    #[test]
    fn should_reject_non_positive_hysteresis() {
        let mut zone = settings("hall");
        zone.hysteresis = Some(0.0);
        let err = ZoneConfig::from_settings(&zone, &common()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidHysteresis(0.0));
    }

    #[test]
    fn should_reject_negative_offset() {
        let mut zone = settings("hall");
        zone.temp_offset = -1.0;
        let err = ZoneConfig::from_settings(&zone, &common()).unwrap_err();
        assert_eq!(err, ValidationError::NegativeOffset(-1.0));
    }

    #[test]
    fn should_fail_without_common_settings() {
        let config = HeatingConfig {
            common: None,
            zones: vec![settings("living")],
        };
        assert_eq!(
            config.zone_configs().unwrap_err(),
            ValidationError::MissingCommonSettings
        );
    }

    #[test]
    fn should_reject_duplicate_zone_names() {
        let config = HeatingConfig {
            common: Some(common()),
            zones: vec![settings("living"), settings("living")],
        };
        assert_eq!(
            config.zone_configs().unwrap_err(),
            ValidationError::DuplicateZone("living".to_string())
        );
    }

    #[test]
    fn should_keep_missing_boiler_relay_as_none() {
        let common = CommonSettings::default();
        let config = ZoneConfig::from_settings(&settings("living"), &common).unwrap();
        assert_eq!(config.boiler_relay, None);
    }

    #[test]
    fn should_resolve_entity_roles() {
        let config = ZoneConfig::from_settings(&settings("living"), &common()).unwrap();
        assert_eq!(
            config.role_of("sensor.living_temperature"),
            Some(EntityRole::Sensor)
        );
        assert_eq!(config.role_of("switch.living_valve"), Some(EntityRole::Relay));
        assert_eq!(
            config.role_of("binary_sensor.living_window"),
            Some(EntityRole::Door)
        );
        assert_eq!(config.role_of("sensor.outdoor"), Some(EntityRole::Outdoor));
        assert_eq!(config.role_of("switch.boiler"), None);
        assert_eq!(config.watched_entities().count(), 4);
    }

    #[test]
    fn should_return_fixed_targets_only_for_fixed_presets() {
        let presets = PresetTemperatures::default();
        assert_eq!(presets.target_for(PresetMode::Eco), Some(19.0));
        assert_eq!(presets.target_for(PresetMode::Auto), None);
    }
}
