//! Snapshot store port: persistence for the restorable part of zone state.

use std::future::Future;

use smartheat_domain::error::SmartHeatError;
use smartheat_domain::zone::ZoneSnapshot;

/// Repository for [`ZoneSnapshot`]s, keyed by zone name.
pub trait SnapshotStore {
    /// Load the last snapshot saved for `zone`.
    fn load(
        &self,
        zone: &str,
    ) -> impl Future<Output = Result<Option<ZoneSnapshot>, SmartHeatError>> + Send;

    /// Insert or replace the snapshot of `snapshot.zone`.
    fn save(
        &self,
        snapshot: ZoneSnapshot,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send;

    /// Forget the snapshot of `zone`. Deleting a missing snapshot is not an error.
    fn delete(&self, zone: &str) -> impl Future<Output = Result<(), SmartHeatError>> + Send;
}

impl<T: SnapshotStore + Send + Sync> SnapshotStore for std::sync::Arc<T> {
    fn load(
        &self,
        zone: &str,
    ) -> impl Future<Output = Result<Option<ZoneSnapshot>, SmartHeatError>> + Send {
        (**self).load(zone)
    }

    fn save(
        &self,
        snapshot: ZoneSnapshot,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        (**self).save(snapshot)
    }

    fn delete(&self, zone: &str) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        (**self).delete(zone)
    }
}
