use smartheat_domain::error::{ActuationError, SmartHeatError};

/// Errors raised by the virtual home.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VirtualError {
    #[error("unknown service {0:?}")]
    UnknownService(String),

    #[error("entity {0:?} is not a switch")]
    NotASwitch(String),
}

impl VirtualError {
    /// Wrap into the domain error for a failed `set_switch(entity_id, on)`.
    #[must_use]
    pub fn into_actuation(self, entity_id: &str, on: bool) -> SmartHeatError {
        ActuationError {
            entity_id: entity_id.to_string(),
            on,
            reason: self.to_string(),
        }
        .into()
    }
}
