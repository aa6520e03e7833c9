use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device not registered")]
    DeviceNotFound,

    #[error("Device is not linked to this user")]
    OwnerNotLinked,

    #[error("Invalid request parameters")]
    InvalidRequest,
}

impl DeviceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::DeviceNotFound => StatusCode::NOT_FOUND,
            DeviceError::OwnerNotLinked => StatusCode::NOT_FOUND,
            DeviceError::InvalidRequest => StatusCode::BAD_REQUEST,
        }
    }
}
