use alerta_api::*;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Alerta", description = "Motion alerts from ESP sensors to their owners"),
    paths(
        super::user_handle::test_auth,
        super::user_handle::register_user,
        super::user_handle::login_user,
        super::user_handle::update_push_token,
        super::esp_handle::register_device,
        super::esp_handle::receive_event,
        super::esp_handle::get_devices_by_owner,
        super::esp_handle::unlink_owner,
        super::schedule_handle::get_schedules,
        super::schedule_handle::create_schedule,
        super::schedule_handle::update_schedule,
        super::schedule_handle::delete_schedule,
        super::event_handle::get_events,
        super::event_handle::clear_events,
    ),
    components(schemas(
        RegisterUserRequest,
        RegisterUserResponse,
        LoginRequest,
        UserInfoResponse,
        UpdatePushTokenRequest,
        RegisterDeviceRequest,
        DeviceInfoResponse,
        SensorEventRequest,
        EventDispatchResponse,
        OwnerOutcome,
        OutcomeReason,
        EventResponse,
        ScheduleRequest,
        ScheduleResponse,
    )),
    tags(
        (name = "user", description = "Account and push token management"),
        (name = "esp", description = "Sensor registration and event intake"),
        (name = "schedule", description = "Per owner notification windows"),
        (name = "event", description = "Per owner event history")
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
