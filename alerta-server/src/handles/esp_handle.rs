use std::sync::Arc;

use alerta_api::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::errors::{ApiError, DeviceError, UserError};
use crate::models::Device;
use crate::repositories::UserRepository;
use crate::services::{DeviceRegistry, EventPipeline};

#[derive(Clone)]
pub struct EspState {
    pub registry: Arc<DeviceRegistry>,
    pub pipeline: Arc<EventPipeline>,
    pub user_repository: Arc<UserRepository>,
}

pub fn esp_router(esp_state: EspState) -> Router {
    Router::new()
        .route("/esp/register", post(register_device))
        .route("/esp/event", post(receive_event))
        .route("/esp/devices/:uid", get(get_devices_by_owner))
        .route("/esp/:mac/owners/:uid", delete(unlink_owner))
        .with_state(esp_state)
}

fn device_response(device: Device, owners: Vec<OwnerId>) -> DeviceInfoResponse {
    DeviceInfoResponse {
        mac: device.id,
        name: device.name,
        location: device.location,
        device_type: device.device_type,
        created_at: device.created_at,
        owners,
    }
}

#[utoipa::path(
    post,
    path = "/esp/register",
    tag = "esp",
    request_body = RegisterDeviceRequest,
    responses(
        (status = 201, description = "Device registered and linked", body = DeviceInfoResponse),
        (status = 400, description = "Missing uid, mac or name"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_device(
    State(state): State<EspState>,
    Json(body): Json<RegisterDeviceRequest>,
) -> Result<(StatusCode, Json<DeviceInfoResponse>), ApiError> {
    let (Some(uid), Some(mac), Some(name)) = (body.uid, body.mac, body.name) else {
        return Err(DeviceError::InvalidRequest.into());
    };

    let device = state
        .registry
        .register(&uid, &mac, &name, &body.location, &body.device_type)
        .await?;
    let owners = state.registry.resolve_owners(&device.id).await?;

    Ok((StatusCode::CREATED, Json(device_response(device, owners))))
}

#[utoipa::path(
    post,
    path = "/esp/event",
    tag = "esp",
    request_body = SensorEventRequest,
    responses(
        (status = 200, description = "Event fanned out to every owner", body = EventDispatchResponse),
        (status = 400, description = "Missing mac or message"),
        (status = 404, description = "Device not registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn receive_event(
    State(state): State<EspState>,
    Json(body): Json<SensorEventRequest>,
) -> Result<Json<EventDispatchResponse>, ApiError> {
    if body.mac.trim().is_empty() || body.message.is_empty() {
        return Err(DeviceError::InvalidRequest.into());
    }

    let response = state.pipeline.process(&body).await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/esp/devices/{uid}",
    tag = "esp",
    params(
        ("uid" = String, Path, description = "Owner ID")
    ),
    responses(
        (status = 200, description = "Devices linked to the owner", body = Vec<DeviceInfoResponse>),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_devices_by_owner(
    State(state): State<EspState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<DeviceInfoResponse>>, ApiError> {
    state
        .user_repository
        .find_by_id(&uid)
        .await?
        .ok_or(UserError::UserNotFound)?;

    let devices = state
        .registry
        .devices_of(&uid)
        .await?
        .into_iter()
        .map(|(device, owners)| device_response(device, owners))
        .collect();

    Ok(Json(devices))
}

#[utoipa::path(
    delete,
    path = "/esp/{mac}/owners/{uid}",
    tag = "esp",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID")
    ),
    responses(
        (status = 204, description = "Owner unlinked, schedules and events removed"),
        (status = 404, description = "Owner is not linked to the device"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn unlink_owner(
    State(state): State<EspState>,
    Path((mac, uid)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.registry.unlink(&mac, &uid).await?;

    Ok(StatusCode::NO_CONTENT)
}
