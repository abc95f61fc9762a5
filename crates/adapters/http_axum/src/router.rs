//! Axum router construction.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use smartheat_app::ports::HeatingControl;

use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn build<H>(state: AppState<H>) -> Router
where
    H: HeatingControl + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .nest("/api", crate::api::routes::<H>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
