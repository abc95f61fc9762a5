//! # smartheat-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for the heating installation
//!   (`/api/zones`, `/api/zones/{name}/…`, `/api/boiler`)
//! - Map HTTP requests into `HeatingControl` calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `smartheat-app` (for the control port) and `smartheat-domain`
//! (for the types serialized in responses). Never leaks axum types into the
//! domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
