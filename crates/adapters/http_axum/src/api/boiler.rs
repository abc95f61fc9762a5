//! JSON handler for the shared boiler.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use smartheat_app::ports::HeatingControl;
use smartheat_domain::boiler::BoilerStatus;

use crate::state::AppState;

/// Possible responses from the boiler endpoint.
pub enum GetResponse {
    Ok(Json<BoilerStatus>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/boiler`
pub async fn get<H>(State(state): State<AppState<H>>) -> GetResponse
where
    H: HeatingControl + Send + Sync + 'static,
{
    GetResponse::Ok(Json(state.control.boiler_status().await))
}
