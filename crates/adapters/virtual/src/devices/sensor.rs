//! Virtual temperature sensor: a first-order room model.

/// Room temperature evolution for one simulation step.
///
/// Every step the room loses `loss_rate` of its difference to `ambient`,
/// and gains `heating_rate` °C while any of its relays is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalModel {
    pub ambient: f64,
    pub loss_rate: f64,
    pub heating_rate: f64,
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self {
            ambient: 12.0,
            loss_rate: 0.02,
            heating_rate: 0.4,
        }
    }
}

impl ThermalModel {
    /// Next reading, rounded to a hundredth of a degree.
    #[must_use]
    pub fn step(&self, current: f64, heating: bool) -> f64 {
        let gain = if heating { self.heating_rate } else { 0.0 };
        let next = current + (self.ambient - current) * self.loss_rate + gain;
        (next * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_cool_towards_ambient_when_idle() {
        let model = ThermalModel::default();
        let next = model.step(20.0, false);
        assert!(next < 20.0);
        assert!(next > model.ambient);
    }

    #[test]
    fn should_warm_up_while_heating() {
        let model = ThermalModel::default();
        assert!(model.step(20.0, true) > 20.0);
    }

    #[test]
    fn should_stay_at_ambient_when_idle() {
        let model = ThermalModel::default();
        assert!((model.step(12.0, false) - 12.0).abs() < f64::EPSILON);
    }
}
