use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use time::UtcOffset;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::configs::{Push, SchemaManager, Server, Settings, Storage};
use crate::handles::*;
use crate::repositories::{EventRepository, ScheduleRepository, UserRepository};
use crate::services::push::{FcmTransport, PushTransport};
use crate::services::{
    DeviceRegistry, EventPipeline, EventRecorder, NotificationDispatcher, ScheduleEvaluator,
};

pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    let storage = Arc::new(
        Storage::new(settings.database.clone(), SchemaManager::default())
            .await
            .context("failed to open storage")?,
    );

    let transport: Arc<dyn PushTransport> =
        Arc::new(FcmTransport::new(&settings.push).context("failed to build push client")?);
    let offset = settings.schedule.utc_offset()?;

    let router = build_router(storage, transport, &settings.push, offset);

    Ok(router.layer(cors_layer(&settings.server)?))
}

/// Wires every service and handle around an already opened storage.
pub fn build_router(
    storage: Arc<Storage>,
    transport: Arc<dyn PushTransport>,
    push: &Push,
    offset: UtcOffset,
) -> Router {
    let user_repository = Arc::new(UserRepository::new(storage.clone()));
    let schedule_repository = Arc::new(ScheduleRepository::new(storage.clone()));
    let event_repository = Arc::new(EventRepository::new(storage.clone()));

    let registry = Arc::new(DeviceRegistry::new(storage.clone()));
    let pipeline = Arc::new(EventPipeline::new(
        registry.clone(),
        Arc::new(ScheduleEvaluator::new(schedule_repository.clone(), offset)),
        Arc::new(EventRecorder::new(event_repository.clone())),
        Arc::new(NotificationDispatcher::new(
            user_repository.clone(),
            transport,
            push.title.clone(),
            Duration::from_millis(push.timeout_ms),
        )),
    ));

    Router::new()
        .merge(user_router(UserState {
            user_repository: user_repository.clone(),
        }))
        .merge(esp_router(EspState {
            registry: registry.clone(),
            pipeline,
            user_repository,
        }))
        .merge(schedule_router(ScheduleState {
            registry: registry.clone(),
            schedule_repository,
        }))
        .merge(event_router(EventState {
            registry,
            event_repository,
        }))
        .merge(docs_router())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &Server) -> anyhow::Result<CorsLayer> {
    if server.cors_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = server
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}
