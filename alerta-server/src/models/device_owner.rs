use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceOwner {
    pub device_id: String,
    pub user_id: String,
    pub created_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct DeviceOwnerTable;

impl Table for DeviceOwnerTable {
    fn name(&self) -> &'static str {
        "devices_owners_link"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS devices_owners_link (
                device_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                PRIMARY KEY (device_id, user_id),
                FOREIGN KEY (device_id) REFERENCES devices (id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_devices_owners_link_user ON devices_owners_link (user_id);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS devices_owners_link;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["users", "devices"]
    }
}
