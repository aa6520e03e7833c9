use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::{Device, DeviceOwner};

#[derive(Clone)]
pub struct DeviceRepository {
    storage: Arc<Storage>,
}

impl DeviceRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl DeviceRepository {
    /// Inserts the device, or refreshes its descriptive fields when the
    /// address is already registered.
    pub async fn upsert(
        &self,
        item: &Device,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO devices (id, name, location, device_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = excluded.name, location = excluded.location, device_type = excluded.device_type
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.location)
        .bind(&item.device_type)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Device>, Error> {
        let device: Option<Device> = sqlx::query_as("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(device)
    }

    pub async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Device>, Error> {
        let devices: Vec<Device> = sqlx::query_as(
            r#"
            SELECT d.* FROM devices d
                JOIN devices_owners_link l ON d.id = l.device_id
                WHERE l.user_id = $1
                ORDER BY l.created_at, d.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(devices)
    }

    pub async fn delete(
        &self,
        id: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&mut **transaction)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct DeviceOwnerRepository {
    storage: Arc<Storage>,
}

impl DeviceOwnerRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl DeviceOwnerRepository {
    /// Links an owner to a device. Linking twice is a no-op.
    pub async fn link(
        &self,
        item: &DeviceOwner,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO devices_owners_link (device_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (device_id, user_id) DO NOTHING
            "#,
        )
        .bind(&item.device_id)
        .bind(&item.user_id)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn find_owner_ids(&self, device_id: &str) -> Result<Vec<String>, Error> {
        let owners: Vec<String> = sqlx::query_scalar(
            "SELECT user_id FROM devices_owners_link WHERE device_id = $1 ORDER BY created_at, user_id",
        )
        .bind(device_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(owners)
    }

    pub async fn exists(&self, device_id: &str, user_id: &str) -> Result<bool, Error> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM devices_owners_link WHERE device_id = $1 AND user_id = $2",
        )
        .bind(device_id)
        .bind(user_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(found.is_some())
    }

    /// Removes the link and, through the cascade, its schedules and events.
    /// Returns the number of owners still linked to the device.
    pub async fn unlink(
        &self,
        device_id: &str,
        user_id: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<Option<i64>, Error> {
        let result = sqlx::query("DELETE FROM devices_owners_link WHERE device_id = $1 AND user_id = $2")
            .bind(device_id)
            .bind(user_id)
            .execute(&mut **transaction)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM devices_owners_link WHERE device_id = $1")
                .bind(device_id)
                .fetch_one(&mut **transaction)
                .await?;

        Ok(Some(remaining))
    }
}
