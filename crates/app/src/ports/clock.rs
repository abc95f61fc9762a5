//! Clock port: local wall-clock time for schedule resolution.

use chrono::{Local, NaiveTime};

/// Source of the local time of day.
pub trait Clock: Send + Sync {
    fn time_of_day(&self) -> NaiveTime;
}

/// [`Clock`] backed by the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn time_of_day(&self) -> NaiveTime {
        Local::now().time()
    }
}

impl<T: Clock> Clock for std::sync::Arc<T> {
    fn time_of_day(&self) -> NaiveTime {
        (**self).time_of_day()
    }
}
