use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Schedule not found")]
    ScheduleNotFound,

    #[error("Invalid clock time")]
    InvalidClockTime,

    #[error("Invalid weekday, expected 0 to 6")]
    InvalidWeekday,
}

impl ScheduleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScheduleError::ScheduleNotFound => StatusCode::NOT_FOUND,
            ScheduleError::InvalidClockTime => StatusCode::BAD_REQUEST,
            ScheduleError::InvalidWeekday => StatusCode::BAD_REQUEST,
        }
    }
}
