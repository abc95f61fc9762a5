//! Periodic schedule re-evaluation for zones in `auto` preset.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::zone_actor::ZoneMessage;

/// Interval between two schedule ticks.
pub const SCHEDULE_TICK: Duration = Duration::from_secs(15 * 60);

/// Cancellable task posting [`ZoneMessage::ScheduleTick`] to a zone mailbox.
///
/// The task only holds a weak sender, so it never keeps a zone alive, and it
/// is aborted when the timer is cancelled or dropped.
#[derive(Debug, Default)]
pub struct ScheduleTimer {
    task: Option<JoinHandle<()>>,
}

impl ScheduleTimer {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start ticking every `period`, first tick one period from now.
    /// Does nothing when already running.
    pub fn start(&mut self, zone: &str, period: Duration, mailbox: WeakUnboundedSender<ZoneMessage>) {
        if self.is_running() {
            return;
        }
        let zone = zone.to_string();
        tracing::debug!(zone = %zone, ?period, "schedule timer started");
        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(sender) = mailbox.upgrade() else {
                    break;
                };
                if sender.send(ZoneMessage::ScheduleTick).is_err() {
                    break;
                }
            }
            tracing::debug!(zone = %zone, "schedule timer exited, mailbox closed");
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ScheduleTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
