use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Email already exists")]
    EmailExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid request parameters")]
    InvalidRequest,
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::EmailExists => StatusCode::CONFLICT,
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::InvalidRequest => StatusCode::BAD_REQUEST,
        }
    }
}
