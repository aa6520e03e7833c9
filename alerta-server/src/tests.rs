use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::configs::{Database, SchemaManager, Storage};
use crate::errors::PushError;
use crate::models::{Device, Schedule, User};
use crate::services::push::{PushNotification, PushTransport};

pub const ALL_DAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

pub async fn setup_test_db() -> Arc<Storage> {
    Arc::new(
        Storage::new(
            Database {
                migration_path: None,
                clean_start: true,
                url: String::from("sqlite::memory:"),
            },
            SchemaManager::default(),
        )
        .await
        .unwrap(),
    )
}

pub async fn create_test_user(storage: Arc<Storage>, email: &str, push_token: Option<&str>) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        push_token: push_token.map(str::to_string),
        created_at: OffsetDateTime::now_utc(),
    };

    sqlx::query("INSERT INTO users (id, email, name, push_token, created_at) VALUES ($1, $2, $3, $4, $5)")
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.push_token)
        .bind(user.created_at)
        .execute(storage.get_pool())
        .await
        .unwrap();

    user
}

pub async fn create_test_device<S: AsRef<str>>(storage: Arc<Storage>, mac: &str, owners: &[S]) -> Device {
    let device = Device {
        id: Device::normalize_id(mac),
        name: format!("Sensor {mac}"),
        location: String::from("Test Room"),
        device_type: String::from("pir"),
        created_at: OffsetDateTime::now_utc(),
    };

    sqlx::query("INSERT INTO devices (id, name, location, device_type, created_at) VALUES ($1, $2, $3, $4, $5)")
        .bind(&device.id)
        .bind(&device.name)
        .bind(&device.location)
        .bind(&device.device_type)
        .bind(device.created_at)
        .execute(storage.get_pool())
        .await
        .unwrap();

    for owner in owners {
        sqlx::query("INSERT INTO devices_owners_link (device_id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(&device.id)
            .bind(owner.as_ref())
            .bind(OffsetDateTime::now_utc())
            .execute(storage.get_pool())
            .await
            .unwrap();
    }

    device
}

pub async fn create_test_schedule(
    storage: Arc<Storage>,
    mac: &str,
    user_id: &str,
    start: (u8, u8),
    end: (u8, u8),
    weekdays: &[u8],
) -> Schedule {
    sqlx::query_as::<_, Schedule>(
        r#"
        INSERT INTO schedules (device_id, user_id, start_hour, start_minute, end_hour, end_minute, weekdays, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
            RETURNING *;
        "#,
    )
    .bind(Device::normalize_id(mac))
    .bind(user_id)
    .bind(start.0)
    .bind(start.1)
    .bind(end.0)
    .bind(end.1)
    .bind(Json(weekdays.to_vec()))
    .bind(OffsetDateTime::now_utc())
    .fetch_one(storage.get_pool())
    .await
    .unwrap()
}

/// In-process push transport that records what it was asked to send.
#[derive(Default)]
pub struct MockPushTransport {
    sent: Mutex<Vec<(String, PushNotification)>>,
    failing: HashSet<String>,
    stalling: HashSet<String>,
    stall: Duration,
}

impl MockPushTransport {
    /// Rejects sends addressed to any of `tokens`.
    pub fn failing_for(tokens: &[&str]) -> Self {
        Self {
            failing: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Sleeps for `stall` before answering sends addressed to `tokens`.
    pub fn stalling_for(tokens: &[&str], stall: Duration) -> Self {
        Self {
            stalling: tokens.iter().map(|t| t.to_string()).collect(),
            stall,
            ..Default::default()
        }
    }

    /// Successful sends, in order.
    pub fn sent(&self) -> Vec<(String, PushNotification)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn send(&self, token: &str, notification: &PushNotification) -> Result<(), PushError> {
        if self.stalling.contains(token) {
            tokio::time::sleep(self.stall).await;
        }

        if self.failing.contains(token) {
            return Err(PushError::Rejected {
                status: 404,
                body: String::from("UNREGISTERED"),
            });
        }

        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), notification.clone()));

        Ok(())
    }
}
