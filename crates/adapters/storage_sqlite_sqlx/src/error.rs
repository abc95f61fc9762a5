//! Storage-specific error type wrapping sqlx errors.

use smartheat_domain::error::SmartHeatError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for SmartHeatError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
