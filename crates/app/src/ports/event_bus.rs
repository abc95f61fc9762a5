//! Event bus port: publish/subscribe for entity state changes.

use std::future::Future;

use smartheat_domain::error::SmartHeatError;
use smartheat_domain::event::StateChange;

/// Publishes state changes to interested subscribers.
pub trait StateChangePublisher {
    /// Publish a state change to all current subscribers.
    fn publish(
        &self,
        change: StateChange,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send;
}

impl<T: StateChangePublisher + Send + Sync> StateChangePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        change: StateChange,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        (**self).publish(change)
    }
}
