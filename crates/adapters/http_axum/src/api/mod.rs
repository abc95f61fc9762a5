//! JSON API handlers.

#[allow(clippy::missing_errors_doc)]
pub mod boiler;
#[allow(clippy::missing_errors_doc)]
pub mod zones;

use axum::Router;
use axum::routing::{get, put};

use smartheat_app::ports::HeatingControl;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H>() -> Router<AppState<H>>
where
    H: HeatingControl + Send + Sync + 'static,
{
    Router::new()
        .route("/zones", get(zones::list::<H>))
        .route("/zones/{name}", get(zones::get::<H>))
        .route(
            "/zones/{name}/temperature",
            put(zones::set_temperature::<H>),
        )
        .route("/zones/{name}/hvac_mode", put(zones::set_hvac_mode::<H>))
        .route(
            "/zones/{name}/preset_mode",
            put(zones::set_preset_mode::<H>),
        )
        .route("/boiler", get(boiler::get::<H>))
}
