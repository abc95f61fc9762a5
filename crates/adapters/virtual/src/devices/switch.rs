//! Virtual switch: responds to `turn_on`, `turn_off`, `toggle`.

use std::str::FromStr;

use smartheat_domain::entity::EntityState;

use crate::error::VirtualError;

/// A service call understood by virtual switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchService {
    TurnOn,
    TurnOff,
    Toggle,
}

impl SwitchService {
    #[must_use]
    pub fn from_on(on: bool) -> Self {
        if on { Self::TurnOn } else { Self::TurnOff }
    }

    /// State of a switch after this service ran on `current`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::NotASwitch`] when `current` holds a value
    /// (the entity is a sensor).
    pub fn apply(self, entity_id: &str, current: &EntityState) -> Result<EntityState, VirtualError> {
        if matches!(current, EntityState::Value(_)) {
            return Err(VirtualError::NotASwitch(entity_id.to_string()));
        }
        Ok(match self {
            Self::TurnOn => EntityState::On,
            Self::TurnOff => EntityState::Off,
            Self::Toggle if current.is_on() => EntityState::Off,
            Self::Toggle => EntityState::On,
        })
    }
}

impl FromStr for SwitchService {
    type Err = VirtualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turn_on" => Ok(Self::TurnOn),
            "turn_off" => Ok(Self::TurnOff),
            "toggle" => Ok(Self::Toggle),
            other => Err(VirtualError::UnknownService(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_turn_on_from_any_switch_state() {
        for current in [EntityState::Off, EntityState::Unknown, EntityState::On] {
            let next = SwitchService::TurnOn.apply("switch.valve", &current).unwrap();
            assert_eq!(next, EntityState::On);
        }
    }

    #[test]
    fn should_toggle_between_on_and_off() {
        let next = SwitchService::Toggle.apply("switch.valve", &EntityState::On).unwrap();
        assert_eq!(next, EntityState::Off);
        let next = SwitchService::Toggle.apply("switch.valve", &EntityState::Off).unwrap();
        assert_eq!(next, EntityState::On);
    }

    #[test]
    fn should_refuse_to_switch_a_sensor() {
        let err = SwitchService::TurnOn
            .apply("sensor.living", &EntityState::from(20.5))
            .unwrap_err();
        assert!(matches!(err, VirtualError::NotASwitch(id) if id == "sensor.living"));
    }

    #[test]
    fn should_parse_service_names() {
        assert_eq!("toggle".parse::<SwitchService>().unwrap(), SwitchService::Toggle);
        assert!(matches!(
            "dim".parse::<SwitchService>(),
            Err(VirtualError::UnknownService(_))
        ));
    }
}
