use std::sync::Arc;

use sqlx::Error;
use time::OffsetDateTime;

use crate::models::Event;
use crate::repositories::EventRepository;

/// Persists one event per (device, owner) pair, whether or not a push follows.
#[derive(Clone)]
pub struct EventRecorder {
    event_repository: Arc<EventRepository>,
}

impl EventRecorder {
    pub fn new(event_repository: Arc<EventRepository>) -> Self {
        Self { event_repository }
    }

    pub async fn record(
        &self,
        device_id: &str,
        owner_id: &str,
        message: &str,
        instant: OffsetDateTime,
    ) -> Result<i64, Error> {
        let event = Event {
            id: 0,
            device_id: device_id.to_string(),
            user_id: owner_id.to_string(),
            message: message.to_string(),
            notified: false,
            created_at: instant,
        };

        let mut tx = self.event_repository.get_pool().begin().await?;
        let id = self.event_repository.create(&event, &mut tx).await?;
        tx.commit().await?;

        Ok(id)
    }

    pub async fn mark_delivered(&self, event_id: i64) -> Result<bool, Error> {
        self.event_repository.mark_notified(event_id).await
    }
}
