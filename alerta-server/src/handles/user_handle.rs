use std::sync::Arc;

use alerta_api::*;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::errors::{ApiError, UserError};
use crate::models::User;
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct UserState {
    pub user_repository: Arc<UserRepository>,
}

pub fn user_router(user_state: UserState) -> Router {
    Router::new()
        .route("/auth/test", get(test_auth))
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/api/token", post(update_push_token))
        .with_state(user_state)
}

#[utoipa::path(
    get,
    path = "/auth/test",
    tag = "user",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
pub async fn test_auth() -> &'static str {
    "Backend acessível com sucesso!"
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "user",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = RegisterUserResponse),
        (status = 400, description = "Missing email or name"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_user(
    State(state): State<UserState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), ApiError> {
    let email = body.email.trim().to_lowercase();
    let name = body.name.trim();
    if email.is_empty() || name.is_empty() {
        return Err(UserError::InvalidRequest.into());
    }

    if state.user_repository.find_by_email(&email).await?.is_some() {
        return Err(UserError::EmailExists.into());
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        name: name.to_string(),
        push_token: None,
        created_at: OffsetDateTime::now_utc(),
    };

    let mut tx = state.user_repository.get_pool().begin().await?;
    match state.user_repository.create(&user, &mut tx).await {
        Ok(()) => {}
        // Lost a race against a concurrent registration
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(UserError::EmailExists.into());
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit().await?;

    info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(RegisterUserResponse { uid: user.id })))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "user",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User found", body = UserInfoResponse),
        (status = 400, description = "Missing email"),
        (status = 404, description = "No user with this email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_user(
    State(state): State<UserState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserInfoResponse>, ApiError> {
    let email = body
        .email
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .ok_or(UserError::InvalidRequest)?;

    let user = state
        .user_repository
        .find_by_email(&email)
        .await?
        .ok_or(UserError::UserNotFound)?;

    Ok(Json(UserInfoResponse {
        uid: user.id,
        display_name: user.name,
        email: user.email,
    }))
}

#[utoipa::path(
    post,
    path = "/api/token",
    tag = "user",
    request_body = UpdatePushTokenRequest,
    responses(
        (status = 200, description = "Push token stored"),
        (status = 400, description = "Missing uid or token"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_push_token(
    State(state): State<UserState>,
    Json(body): Json<UpdatePushTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(uid), Some(token)) = (body.uid, body.token) else {
        return Err(UserError::InvalidRequest.into());
    };
    if uid.is_empty() || token.is_empty() {
        return Err(UserError::InvalidRequest.into());
    }

    let mut tx = state.user_repository.get_pool().begin().await?;
    let updated = state
        .user_repository
        .update_push_token(&uid, Some(&token), &mut tx)
        .await?;
    if !updated {
        return Err(UserError::UserNotFound.into());
    }
    tx.commit().await?;

    info!(user_id = %uid, "push token updated");

    Ok(Json(json!({ "message": "Token updated" })))
}
