use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::Event;

#[derive(Clone)]
pub struct EventRepository {
    storage: Arc<Storage>,
}

impl EventRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl EventRepository {
    pub async fn create(
        &self,
        item: &Event,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i64, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO events (device_id, user_id, message, notified, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.device_id)
        .bind(&item.user_id)
        .bind(&item.message)
        .bind(item.notified)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, Error> {
        let event: Option<Event> = sqlx::query_as("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(event)
    }

    /// Events of one (device, owner) pair, newest first.
    pub async fn find_by_owner(
        &self,
        device_id: &str,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<Event>, Error> {
        let events: Vec<Event> = sqlx::query_as(
            r#"
            SELECT * FROM events
            WHERE device_id = $1 AND user_id = $2
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(device_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(events)
    }

    /// Flips the delivery flag. Already delivered events are left untouched.
    pub async fn mark_notified(&self, id: i64) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE events SET notified = TRUE WHERE id = $1 AND notified = FALSE")
            .bind(id)
            .execute(self.storage.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_owner(
        &self,
        device_id: &str,
        user_id: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM events WHERE device_id = $1 AND user_id = $2")
            .bind(device_id)
            .bind(user_id)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected())
    }
}
