//! # smartheat-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `SnapshotStore` port defined in `smartheat-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between zone snapshots and database rows
//!
//! ## Dependency rule
//! Depends on `smartheat-app` (for port traits) and `smartheat-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod snapshot_repo;

pub use pool::{Config, Database};
pub use snapshot_repo::SqliteSnapshotStore;
