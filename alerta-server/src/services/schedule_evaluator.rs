use std::sync::Arc;

use sqlx::Error;
use time::{OffsetDateTime, UtcOffset};

use crate::models::Schedule;
use crate::repositories::ScheduleRepository;

/// Decides whether an owner accepts alerts from a device at a given instant.
#[derive(Clone)]
pub struct ScheduleEvaluator {
    schedule_repository: Arc<ScheduleRepository>,
    offset: UtcOffset,
}

impl ScheduleEvaluator {
    pub fn new(schedule_repository: Arc<ScheduleRepository>, offset: UtcOffset) -> Self {
        Self {
            schedule_repository,
            offset,
        }
    }

    /// True when at least one of the pair's schedules is active. An owner
    /// without schedules is denied.
    pub async fn permits(
        &self,
        device_id: &str,
        owner_id: &str,
        instant: OffsetDateTime,
    ) -> Result<bool, Error> {
        let schedules = self
            .schedule_repository
            .find_by_owner(device_id, owner_id)
            .await?;

        Ok(any_active(&schedules, instant, self.offset))
    }
}

pub fn any_active(schedules: &[Schedule], instant: OffsetDateTime, offset: UtcOffset) -> bool {
    schedules
        .iter()
        .any(|schedule| schedule.is_active(instant, offset))
}
