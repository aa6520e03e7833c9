use super::{DeviceError, ScheduleError, UserError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Device error: {0}")]
    DeviceError(#[from] DeviceError),

    #[error("Schedule error: {0}")]
    ScheduleError(#[from] ScheduleError),

    #[error("User error: {0}")]
    UserError(#[from] UserError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
