//! JSON handlers for zones: status and the three zone commands.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smartheat_app::ports::HeatingControl;
use smartheat_domain::error::SmartHeatError;
use smartheat_domain::zone::{HvacMode, PresetMode, ZoneStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `PUT /api/zones/{name}/temperature`.
#[derive(Deserialize)]
pub struct SetTemperatureRequest {
    pub temperature: f64,
}

/// Request body for `PUT /api/zones/{name}/hvac_mode`.
///
/// Kept as a string so unknown modes surface as a validation error.
#[derive(Deserialize)]
pub struct SetHvacModeRequest {
    pub hvac_mode: String,
}

/// Request body for `PUT /api/zones/{name}/preset_mode`.
#[derive(Deserialize)]
pub struct SetPresetModeRequest {
    pub preset_mode: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ZoneStatus>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and command endpoints.
pub enum ZoneResponse {
    Ok(Json<ZoneStatus>),
}

impl IntoResponse for ZoneResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/zones`
pub async fn list<H>(State(state): State<AppState<H>>) -> ListResponse
where
    H: HeatingControl + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.control.list_zones().await))
}

/// `GET /api/zones/{name}`
pub async fn get<H>(
    State(state): State<AppState<H>>,
    Path(name): Path<String>,
) -> Result<ZoneResponse, ApiError>
where
    H: HeatingControl + Send + Sync + 'static,
{
    let status = state.control.zone_status(&name).await?;
    Ok(ZoneResponse::Ok(Json(status)))
}

/// `PUT /api/zones/{name}/temperature`
pub async fn set_temperature<H>(
    State(state): State<AppState<H>>,
    Path(name): Path<String>,
    Json(req): Json<SetTemperatureRequest>,
) -> Result<ZoneResponse, ApiError>
where
    H: HeatingControl + Send + Sync + 'static,
{
    let status = state
        .control
        .set_target_temperature(&name, req.temperature)
        .await?;
    Ok(ZoneResponse::Ok(Json(status)))
}

/// `PUT /api/zones/{name}/hvac_mode`
pub async fn set_hvac_mode<H>(
    State(state): State<AppState<H>>,
    Path(name): Path<String>,
    Json(req): Json<SetHvacModeRequest>,
) -> Result<ZoneResponse, ApiError>
where
    H: HeatingControl + Send + Sync + 'static,
{
    let mode: HvacMode = req.hvac_mode.parse().map_err(SmartHeatError::from)?;
    let status = state.control.set_hvac_mode(&name, mode).await?;
    Ok(ZoneResponse::Ok(Json(status)))
}

/// `PUT /api/zones/{name}/preset_mode`
pub async fn set_preset_mode<H>(
    State(state): State<AppState<H>>,
    Path(name): Path<String>,
    Json(req): Json<SetPresetModeRequest>,
) -> Result<ZoneResponse, ApiError>
where
    H: HeatingControl + Send + Sync + 'static,
{
    let preset: PresetMode = req.preset_mode.parse().map_err(SmartHeatError::from)?;
    let status = state.control.set_preset_mode(&name, preset).await?;
    Ok(ZoneResponse::Ok(Json(status)))
}
