use std::sync::Arc;

use alerta_api::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use sqlx::types::Json as SqlJson;
use time::OffsetDateTime;

use crate::errors::{ApiError, ScheduleError};
use crate::models::{ClockTime, Schedule};
use crate::repositories::ScheduleRepository;
use crate::services::DeviceRegistry;

#[derive(Clone)]
pub struct ScheduleState {
    pub registry: Arc<DeviceRegistry>,
    pub schedule_repository: Arc<ScheduleRepository>,
}

pub fn schedule_router(schedule_state: ScheduleState) -> Router {
    Router::new()
        .route(
            "/esp/:mac/owners/:uid/schedules",
            get(get_schedules).post(create_schedule),
        )
        .route(
            "/esp/:mac/owners/:uid/schedules/:schedule_id",
            put(update_schedule).delete(delete_schedule),
        )
        .with_state(schedule_state)
}

/// Rejects impossible clock times and returns the weekdays sorted and
/// without repeats.
fn validate(body: &ScheduleRequest) -> Result<Vec<u8>, ScheduleError> {
    ClockTime::new(body.start_hour, body.start_minute).ok_or(ScheduleError::InvalidClockTime)?;
    ClockTime::new(body.end_hour, body.end_minute).ok_or(ScheduleError::InvalidClockTime)?;

    if body.weekdays.iter().any(|day| *day > 6) {
        return Err(ScheduleError::InvalidWeekday);
    }

    let mut weekdays = body.weekdays.clone();
    weekdays.sort_unstable();
    weekdays.dedup();

    Ok(weekdays)
}

fn schedule_response(schedule: Schedule) -> ScheduleResponse {
    ScheduleResponse {
        id: schedule.id,
        device_id: schedule.device_id,
        user_id: schedule.user_id,
        start_hour: schedule.start_hour,
        start_minute: schedule.start_minute,
        end_hour: schedule.end_hour,
        end_minute: schedule.end_minute,
        weekdays: schedule.weekdays.0,
        enabled: schedule.enabled,
        created_at: schedule.created_at,
    }
}

/// Loads a schedule and checks it belongs to the (device, owner) pair.
async fn find_owned(
    state: &ScheduleState,
    device_id: &str,
    uid: &str,
    schedule_id: i64,
) -> Result<Schedule, ApiError> {
    let schedule = state
        .schedule_repository
        .find_by_id(schedule_id)
        .await?
        .filter(|schedule| schedule.device_id == device_id && schedule.user_id == uid)
        .ok_or(ScheduleError::ScheduleNotFound)?;

    Ok(schedule)
}

#[utoipa::path(
    get,
    path = "/esp/{mac}/owners/{uid}/schedules",
    tag = "schedule",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID")
    ),
    responses(
        (status = 200, description = "Schedules of the pair", body = Vec<ScheduleResponse>),
        (status = 404, description = "Owner is not linked to the device"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_schedules(
    State(state): State<ScheduleState>,
    Path((mac, uid)): Path<(String, String)>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let device_id = state.registry.ensure_linked(&mac, &uid).await?;

    let schedules = state
        .schedule_repository
        .find_by_owner(&device_id, &uid)
        .await?
        .into_iter()
        .map(schedule_response)
        .collect();

    Ok(Json(schedules))
}

#[utoipa::path(
    post,
    path = "/esp/{mac}/owners/{uid}/schedules",
    tag = "schedule",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID")
    ),
    request_body = ScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Invalid clock time or weekday"),
        (status = 404, description = "Owner is not linked to the device"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_schedule(
    State(state): State<ScheduleState>,
    Path((mac, uid)): Path<(String, String)>,
    Json(body): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let weekdays = validate(&body)?;
    let device_id = state.registry.ensure_linked(&mac, &uid).await?;

    let schedule = Schedule {
        id: 0,
        device_id,
        user_id: uid,
        start_hour: body.start_hour,
        start_minute: body.start_minute,
        end_hour: body.end_hour,
        end_minute: body.end_minute,
        weekdays: SqlJson(weekdays),
        enabled: body.enabled,
        created_at: OffsetDateTime::now_utc(),
    };

    let mut tx = state.schedule_repository.get_pool().begin().await?;
    let schedule_id = state.schedule_repository.create(&schedule, &mut tx).await?;
    tx.commit().await?;

    let created = state
        .schedule_repository
        .find_by_id(schedule_id)
        .await?
        .ok_or(ScheduleError::ScheduleNotFound)?;

    Ok((StatusCode::CREATED, Json(schedule_response(created))))
}

#[utoipa::path(
    put,
    path = "/esp/{mac}/owners/{uid}/schedules/{schedule_id}",
    tag = "schedule",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID"),
        ("schedule_id" = i64, Path, description = "Schedule ID")
    ),
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Schedule replaced", body = ScheduleResponse),
        (status = 400, description = "Invalid clock time or weekday"),
        (status = 404, description = "Owner not linked or schedule not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_schedule(
    State(state): State<ScheduleState>,
    Path((mac, uid, schedule_id)): Path<(String, String, i64)>,
    Json(body): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let weekdays = validate(&body)?;
    let device_id = state.registry.ensure_linked(&mac, &uid).await?;

    let mut schedule = find_owned(&state, &device_id, &uid, schedule_id).await?;
    schedule.start_hour = body.start_hour;
    schedule.start_minute = body.start_minute;
    schedule.end_hour = body.end_hour;
    schedule.end_minute = body.end_minute;
    schedule.weekdays = SqlJson(weekdays);
    schedule.enabled = body.enabled;

    let mut tx = state.schedule_repository.get_pool().begin().await?;
    state
        .schedule_repository
        .update(schedule_id, &schedule, &mut tx)
        .await?;
    tx.commit().await?;

    Ok(Json(schedule_response(schedule)))
}

#[utoipa::path(
    delete,
    path = "/esp/{mac}/owners/{uid}/schedules/{schedule_id}",
    tag = "schedule",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID"),
        ("schedule_id" = i64, Path, description = "Schedule ID")
    ),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Owner not linked or schedule not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_schedule(
    State(state): State<ScheduleState>,
    Path((mac, uid, schedule_id)): Path<(String, String, i64)>,
) -> Result<StatusCode, ApiError> {
    let device_id = state.registry.ensure_linked(&mac, &uid).await?;
    find_owned(&state, &device_id, &uid, schedule_id).await?;

    let mut tx = state.schedule_repository.get_pool().begin().await?;
    state.schedule_repository.delete(schedule_id, &mut tx).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
