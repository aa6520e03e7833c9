use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Id, OwnerId};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Window start hour (0-23)
    pub start_hour: u8,
    /// Window start minute (0-59)
    pub start_minute: u8,
    /// Window end hour (0-23)
    pub end_hour: u8,
    /// Window end minute (0-59)
    pub end_minute: u8,
    /// Weekdays the window applies to, 0 = Sunday
    pub weekdays: Vec<u8>,
    /// Disabled windows never match
    #[serde(alias = "ativo", default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: Id,
    pub device_id: String,
    pub user_id: OwnerId,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    pub weekdays: Vec<u8>,
    pub enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
