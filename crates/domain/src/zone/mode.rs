//! HVAC mode, preset mode and the derived HVAC action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Whether the zone is allowed to heat at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    #[default]
    Off,
    Heat,
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Heat => f.write_str("heat"),
        }
    }
}

impl FromStr for HvacMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            other => Err(ValidationError::UnknownHvacMode(other.to_string())),
        }
    }
}

/// How the target temperature is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetMode {
    /// Target follows the schedule.
    Auto,
    /// Target stays where it was last set.
    #[default]
    Manual,
    Comfort,
    Eco,
    Away,
}

impl PresetMode {
    pub const ALL: [Self; 5] = [
        Self::Auto,
        Self::Manual,
        Self::Comfort,
        Self::Eco,
        Self::Away,
    ];

    /// Whether entering this preset overrides the target with a fixed value.
    #[must_use]
    pub fn is_fixed_target(self) -> bool {
        matches!(self, Self::Comfort | Self::Eco | Self::Away)
    }
}

impl fmt::Display for PresetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
            Self::Comfort => "comfort",
            Self::Eco => "eco",
            Self::Away => "away",
        };
        f.write_str(name)
    }
}

impl FromStr for PresetMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.to_string() == s)
            .ok_or_else(|| ValidationError::UnknownPreset(s.to_string()))
    }
}

/// What the zone is doing right now, as shown to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacAction {
    Heating,
    Idle,
    Off,
}

impl HvacAction {
    /// Derive the action from the HVAC mode and the actuation state.
    ///
    /// A zone switched off but still heating (relay held on by hand)
    /// reports `heating`: the action follows reality.
    #[must_use]
    pub fn derive(mode: HvacMode, is_heating: bool) -> Self {
        match (mode, is_heating) {
            (_, true) => Self::Heating,
            (HvacMode::Heat, false) => Self::Idle,
            (HvacMode::Off, false) => Self::Off,
        }
    }
}

impl fmt::Display for HvacAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heating => f.write_str("heating"),
            Self::Idle => f.write_str("idle"),
            Self::Off => f.write_str("off"),
        }
    }
}
