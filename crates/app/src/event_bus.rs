//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use smartheat_domain::error::SmartHeatError;
use smartheat_domain::event::StateChange;

use crate::ports::StateChangePublisher;

/// In-process bus carrying [`StateChange`]s from the host to the zones.
///
/// Publishing succeeds even when there are no active subscribers
/// (the change is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<StateChange>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to changes published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }
}

impl StateChangePublisher for InProcessEventBus {
    fn publish(
        &self,
        change: StateChange,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        // send only fails without receivers
        let _ = self.sender.send(change);
        async { Ok(()) }
    }
}
