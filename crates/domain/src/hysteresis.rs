//! Hysteresis policy: the dead band around the target temperature.

use serde::{Deserialize, Serialize};

/// Heating profile of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingMode {
    #[default]
    Radiator,
    /// Floor loops switch instantly at the target, without a dead band.
    Underfloor,
}

/// Ascending `(threshold, multiplier)` pairs for adaptive hysteresis.
///
/// The first threshold strictly greater than the outdoor temperature
/// selects the multiplier; at or above the last threshold the band is
/// left unchanged.
pub const ADAPTIVE_STEPS: [(f64, f64); 3] = [(-10.0, 2.0), (0.0, 1.5), (10.0, 1.2)];

/// Multiplier applied to the base hysteresis for a given outdoor temperature.
#[must_use]
pub fn adaptive_multiplier(outdoor: f64) -> f64 {
    ADAPTIVE_STEPS
        .iter()
        .find(|(threshold, _)| *threshold > outdoor)
        .map_or(1.0, |(_, multiplier)| *multiplier)
}

/// Effective hysteresis band for a zone.
///
/// Underfloor zones always get `0.0`. Radiator zones get `base`, widened by
/// [`adaptive_multiplier`] when adaptive hysteresis is enabled and the
/// outdoor temperature is known.
#[must_use]
pub fn effective_hysteresis(
    mode: HeatingMode,
    base: f64,
    adaptive_enabled: bool,
    outdoor: Option<f64>,
) -> f64 {
    if mode == HeatingMode::Underfloor {
        return 0.0;
    }
    match outdoor {
        Some(outdoor) if adaptive_enabled => base * adaptive_multiplier(outdoor),
        _ => base,
    }
}
