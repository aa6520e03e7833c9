use std::sync::Arc;

use alerta_api::*;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::ApiError;
use crate::repositories::EventRepository;
use crate::services::DeviceRegistry;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct EventState {
    pub registry: Arc<DeviceRegistry>,
    pub event_repository: Arc<EventRepository>,
}

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub limit: Option<i64>,
}

pub fn event_router(event_state: EventState) -> Router {
    Router::new()
        .route(
            "/esp/:mac/owners/:uid/events",
            get(get_events).delete(clear_events),
        )
        .with_state(event_state)
}

#[utoipa::path(
    get,
    path = "/esp/{mac}/owners/{uid}/events",
    tag = "event",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID"),
        ("limit" = Option<i64>, Query, description = "Maximum number of events, newest first")
    ),
    responses(
        (status = 200, description = "Event history of the pair", body = Vec<EventResponse>),
        (status = 404, description = "Owner is not linked to the device"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_events(
    State(state): State<EventState>,
    Path((mac, uid)): Path<(String, String)>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let device_id = state.registry.ensure_linked(&mac, &uid).await?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let events = state
        .event_repository
        .find_by_owner(&device_id, &uid, limit)
        .await?
        .into_iter()
        .map(|event| EventResponse {
            id: event.id,
            device_id: event.device_id,
            user_id: event.user_id,
            message: event.message,
            notified: event.notified,
            created_at: event.created_at,
        })
        .collect();

    Ok(Json(events))
}

#[utoipa::path(
    delete,
    path = "/esp/{mac}/owners/{uid}/events",
    tag = "event",
    params(
        ("mac" = String, Path, description = "Device hardware address"),
        ("uid" = String, Path, description = "Owner ID")
    ),
    responses(
        (status = 200, description = "Number of deleted events"),
        (status = 404, description = "Owner is not linked to the device"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn clear_events(
    State(state): State<EventState>,
    Path((mac, uid)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let device_id = state.registry.ensure_linked(&mac, &uid).await?;

    let mut tx = state.event_repository.get_pool().begin().await?;
    let deleted = state
        .event_repository
        .delete_by_owner(&device_id, &uid, &mut tx)
        .await?;
    tx.commit().await?;

    info!(device_id = %device_id, user_id = %uid, deleted, "event history cleared");

    Ok(Json(json!({ "deleted": deleted })))
}
