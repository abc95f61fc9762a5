//! Home ports: reading entity states and driving switches on the host.

use std::future::Future;

use smartheat_domain::entity::EntityState;
use smartheat_domain::error::SmartHeatError;

/// Read-only access to the current state of host entities.
pub trait StateReader {
    /// Current state of `entity_id`, or `None` when the host does not know it.
    fn get_state(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, SmartHeatError>> + Send;
}

/// Command sink for on/off switches (zone relays and the boiler relay).
pub trait SwitchActuator {
    /// Switch `entity_id` on or off.
    ///
    /// Completion only means the command was delivered. The resulting state
    /// is observed later through a state change.
    fn set_switch(
        &self,
        entity_id: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send;
}

impl<T: StateReader + Send + Sync> StateReader for std::sync::Arc<T> {
    fn get_state(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Option<EntityState>, SmartHeatError>> + Send {
        (**self).get_state(entity_id)
    }
}

impl<T: SwitchActuator + Send + Sync> SwitchActuator for std::sync::Arc<T> {
    fn set_switch(
        &self,
        entity_id: &str,
        on: bool,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        (**self).set_switch(entity_id, on)
    }
}
