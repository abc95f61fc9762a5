//! `SQLite` implementation of [`SnapshotStore`].

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smartheat_app::ports::SnapshotStore;
use smartheat_domain::error::SmartHeatError;
use smartheat_domain::zone::{HvacMode, PresetMode, ZoneSnapshot};

use crate::error::StorageError;

/// Wrapper for converting database rows into [`ZoneSnapshot`].
struct Wrapper(ZoneSnapshot);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let zone: String = row.try_get("zone")?;
        let target_temperature: f64 = row.try_get("target_temperature")?;
        let hvac_mode: String = row.try_get("hvac_mode")?;
        let preset_mode: String = row.try_get("preset_mode")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        let hvac_mode =
            HvacMode::from_str(&hvac_mode).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let preset_mode = PresetMode::from_str(&preset_mode)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(ZoneSnapshot {
            zone,
            target_temperature,
            hvac_mode,
            preset_mode,
            updated_at,
        }))
    }
}

const UPSERT: &str = "INSERT INTO zone_snapshots (zone, target_temperature, hvac_mode, preset_mode, updated_at) \
     VALUES (?, ?, ?, ?, ?) \
     ON CONFLICT(zone) DO UPDATE SET \
     target_temperature = excluded.target_temperature, \
     hvac_mode = excluded.hvac_mode, \
     preset_mode = excluded.preset_mode, \
     updated_at = excluded.updated_at";
const SELECT_BY_ZONE: &str = "SELECT * FROM zone_snapshots WHERE zone = ?";
const DELETE_BY_ZONE: &str = "DELETE FROM zone_snapshots WHERE zone = ?";

/// `SQLite`-backed zone snapshot store.
#[derive(Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(
        &self,
        zone: &str,
    ) -> impl Future<Output = Result<Option<ZoneSnapshot>, SmartHeatError>> + Send {
        let pool = self.pool.clone();
        let zone = zone.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ZONE)
                .bind(zone)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn save(
        &self,
        snapshot: ZoneSnapshot,
    ) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(&snapshot.zone)
                .bind(snapshot.target_temperature)
                .bind(snapshot.hvac_mode.to_string())
                .bind(snapshot.preset_mode.to_string())
                .bind(snapshot.updated_at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn delete(&self, zone: &str) -> impl Future<Output = Result<(), SmartHeatError>> + Send {
        let pool = self.pool.clone();
        let zone = zone.to_string();
        async move {
            sqlx::query(DELETE_BY_ZONE)
                .bind(zone)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use smartheat_domain::time::now;

    async fn setup() -> SqliteSnapshotStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteSnapshotStore::new(db.pool().clone())
    }

    fn snapshot(zone: &str, target: f64) -> ZoneSnapshot {
        ZoneSnapshot {
            zone: zone.to_string(),
            target_temperature: target,
            hvac_mode: HvacMode::Heat,
            preset_mode: PresetMode::Eco,
            updated_at: now(),
        }
    }

    #[tokio::test]
    async fn should_save_and_load_snapshot() {
        let store = setup().await;

        store.save(snapshot("living", 19.5)).await.unwrap();

        let loaded = store.load("living").await.unwrap().unwrap();
        assert_eq!(loaded.zone, "living");
        assert!((loaded.target_temperature - 19.5).abs() < f64::EPSILON);
        assert_eq!(loaded.hvac_mode, HvacMode::Heat);
        assert_eq!(loaded.preset_mode, PresetMode::Eco);
    }

    #[tokio::test]
    async fn should_return_none_when_zone_never_saved() {
        let store = setup().await;
        assert!(store.load("attic").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_replace_existing_snapshot() {
        let store = setup().await;
        store.save(snapshot("living", 19.5)).await.unwrap();

        let mut updated = snapshot("living", 22.0);
        updated.preset_mode = PresetMode::Manual;
        store.save(updated).await.unwrap();

        let loaded = store.load("living").await.unwrap().unwrap();
        assert!((loaded.target_temperature - 22.0).abs() < f64::EPSILON);
        assert_eq!(loaded.preset_mode, PresetMode::Manual);
    }

    #[tokio::test]
    async fn should_delete_snapshot() {
        let store = setup().await;
        store.save(snapshot("living", 19.5)).await.unwrap();
        store.save(snapshot("office", 20.0)).await.unwrap();

        store.delete("living").await.unwrap();

        assert!(store.load("living").await.unwrap().is_none());
        assert!(store.load("office").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn should_ignore_delete_of_missing_snapshot() {
        let store = setup().await;
        assert!(store.delete("attic").await.is_ok());
    }

    #[tokio::test]
    async fn should_fail_to_decode_unknown_preset() {
        let store = setup().await;
        sqlx::query(UPSERT)
            .bind("living")
            .bind(20.0)
            .bind("heat")
            .bind("boost")
            .bind(now())
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store.load("living").await;

        assert!(matches!(result, Err(SmartHeatError::Storage(_))));
    }
}
