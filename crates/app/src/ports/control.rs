//! Control port: the driving side used by user-facing adapters (HTTP API).

use std::future::Future;

use smartheat_domain::boiler::BoilerStatus;
use smartheat_domain::error::SmartHeatError;
use smartheat_domain::zone::{HvacMode, PresetMode, ZoneStatus};

/// Read zone and boiler status and issue the three zone commands.
///
/// Commands addressed to an unknown zone fail with
/// [`SmartHeatError::NotFound`].
pub trait HeatingControl {
    /// Status of every zone, sorted by name.
    fn list_zones(&self) -> impl Future<Output = Vec<ZoneStatus>> + Send;

    fn zone_status(
        &self,
        zone: &str,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send;

    fn set_target_temperature(
        &self,
        zone: &str,
        value: f64,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send;

    fn set_hvac_mode(
        &self,
        zone: &str,
        mode: HvacMode,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send;

    fn set_preset_mode(
        &self,
        zone: &str,
        preset: PresetMode,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send;

    fn boiler_status(&self) -> impl Future<Output = BoilerStatus> + Send;
}

impl<T: HeatingControl + Send + Sync> HeatingControl for std::sync::Arc<T> {
    fn list_zones(&self) -> impl Future<Output = Vec<ZoneStatus>> + Send {
        (**self).list_zones()
    }

    fn zone_status(
        &self,
        zone: &str,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send {
        (**self).zone_status(zone)
    }

    fn set_target_temperature(
        &self,
        zone: &str,
        value: f64,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send {
        (**self).set_target_temperature(zone, value)
    }

    fn set_hvac_mode(
        &self,
        zone: &str,
        mode: HvacMode,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send {
        (**self).set_hvac_mode(zone, mode)
    }

    fn set_preset_mode(
        &self,
        zone: &str,
        preset: PresetMode,
    ) -> impl Future<Output = Result<ZoneStatus, SmartHeatError>> + Send {
        (**self).set_preset_mode(zone, preset)
    }

    fn boiler_status(&self) -> impl Future<Output = BoilerStatus> + Send {
        (**self).boiler_status()
    }
}
