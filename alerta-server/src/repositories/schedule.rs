use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::Schedule;

#[derive(Clone)]
pub struct ScheduleRepository {
    storage: Arc<Storage>,
}

impl ScheduleRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl ScheduleRepository {
    pub async fn create(
        &self,
        item: &Schedule,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i64, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO schedules (device_id, user_id, start_hour, start_minute, end_hour, end_minute, weekdays, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&item.device_id)
        .bind(&item.user_id)
        .bind(item.start_hour)
        .bind(item.start_minute)
        .bind(item.end_hour)
        .bind(item.end_minute)
        .bind(&item.weekdays)
        .bind(item.enabled)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Schedule>, Error> {
        let schedule: Option<Schedule> = sqlx::query_as("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(schedule)
    }

    /// Every schedule of one (device, owner) pair, oldest first.
    pub async fn find_by_owner(&self, device_id: &str, user_id: &str) -> Result<Vec<Schedule>, Error> {
        let schedules: Vec<Schedule> = sqlx::query_as(
            "SELECT * FROM schedules WHERE device_id = $1 AND user_id = $2 ORDER BY id",
        )
        .bind(device_id)
        .bind(user_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(schedules)
    }

    pub async fn update(
        &self,
        id: i64,
        item: &Schedule,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE schedules
            SET start_hour = $1, start_minute = $2, end_hour = $3, end_minute = $4, weekdays = $5, enabled = $6
            WHERE id = $7
            "#,
        )
        .bind(item.start_hour)
        .bind(item.start_minute)
        .bind(item.end_hour)
        .bind(item.end_minute)
        .bind(&item.weekdays)
        .bind(item.enabled)
        .bind(id)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn delete(
        &self,
        id: i64,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&mut **transaction)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;

    use crate::tests::*;

    use super::*;

    #[tokio::test]
    async fn test_find_schedules_by_owner() {
        let storage = setup_test_db().await;
        let first = create_test_user(storage.clone(), "a@example.com", None).await;
        let second = create_test_user(storage.clone(), "b@example.com", None).await;
        create_test_device(storage.clone(), "aa:bb:cc", &[&first.id, &second.id]).await;

        create_test_schedule(storage.clone(), "aa:bb:cc", &first.id, (8, 0), (18, 0), &[1, 2, 3]).await;
        create_test_schedule(storage.clone(), "aa:bb:cc", &first.id, (22, 0), (6, 0), &[5]).await;
        create_test_schedule(storage.clone(), "aa:bb:cc", &second.id, (0, 0), (23, 59), &[0]).await;

        let repo = ScheduleRepository::new(storage.clone());
        let schedules = repo.find_by_owner("aa:bb:cc", &first.id).await.unwrap();

        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].weekdays.0, vec![1, 2, 3]);
        assert_eq!((schedules[1].start_hour, schedules[1].end_hour), (22, 6));
        assert!(schedules.iter().all(|s| s.enabled));
    }

    #[tokio::test]
    async fn test_update_schedule() {
        let storage = setup_test_db().await;
        let owner = create_test_user(storage.clone(), "a@example.com", None).await;
        create_test_device(storage.clone(), "aa:bb:cc", &[&owner.id]).await;
        let schedule =
            create_test_schedule(storage.clone(), "aa:bb:cc", &owner.id, (8, 0), (18, 0), &[1]).await;

        let repo = ScheduleRepository::new(storage.clone());
        let updated = Schedule {
            end_hour: 20,
            weekdays: Json(vec![]),
            enabled: false,
            ..schedule.clone()
        };

        let mut tx = storage.get_pool().begin().await.unwrap();
        repo.update(schedule.id, &updated, &mut tx).await.unwrap();
        tx.commit().await.unwrap();

        let found = repo.find_by_id(schedule.id).await.unwrap().unwrap();
        assert_eq!(found.end_hour, 20);
        assert!(found.weekdays.is_empty());
        assert!(!found.enabled);
    }

    #[tokio::test]
    async fn test_schedule_requires_link() {
        let storage = setup_test_db().await;
        let owner = create_test_user(storage.clone(), "a@example.com", None).await;

        let repo = ScheduleRepository::new(storage.clone());
        let orphan = Schedule {
            id: 0,
            device_id: "ff:ff:ff".to_string(),
            user_id: owner.id.clone(),
            start_hour: 0,
            start_minute: 0,
            end_hour: 1,
            end_minute: 0,
            weekdays: Json(vec![0]),
            enabled: true,
            created_at: time::OffsetDateTime::now_utc(),
        };

        let mut tx = storage.get_pool().begin().await.unwrap();
        assert!(repo.create(&orphan, &mut tx).await.is_err());
    }
}
