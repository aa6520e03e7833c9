use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

/// One sensor trigger as seen by one owner. Only `notified` ever changes,
/// and only from false to true.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub device_id: String,
    pub user_id: String,
    pub message: String,
    pub notified: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct EventTable;

impl Table for EventTable {
    fn name(&self) -> &'static str {
        "events"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                message TEXT NOT NULL,
                notified BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL,
                FOREIGN KEY (device_id, user_id) REFERENCES devices_owners_link (device_id, user_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_events_owner ON events (device_id, user_id);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS events;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["devices_owners_link"]
    }
}
