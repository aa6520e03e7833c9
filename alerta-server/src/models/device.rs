use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    /// Normalised hardware address
    pub id: String,
    pub name: String,
    pub location: String,
    pub device_type: String,
    pub created_at: OffsetDateTime,
}

impl Device {
    /// Canonical key of a hardware address: trimmed and lower-cased.
    pub fn normalize_id(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

#[derive(Clone)]
pub struct DeviceTable;

impl Table for DeviceTable {
    fn name(&self) -> &'static str {
        "devices"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS devices (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                location TEXT NOT NULL DEFAULT '',
                device_type TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS devices;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}
