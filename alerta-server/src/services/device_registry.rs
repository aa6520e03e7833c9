use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;

use crate::configs::Storage;
use crate::errors::{ApiError, DeviceError, UserError};
use crate::models::{Device, DeviceOwner};
use crate::repositories::{DeviceOwnerRepository, DeviceRepository, UserRepository};

/// Maps hardware addresses to the owners linked to them.
#[derive(Clone)]
pub struct DeviceRegistry {
    device_repository: Arc<DeviceRepository>,
    device_owner_repository: Arc<DeviceOwnerRepository>,
    user_repository: Arc<UserRepository>,
}

impl DeviceRegistry {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            device_repository: Arc::new(DeviceRepository::new(storage.clone())),
            device_owner_repository: Arc::new(DeviceOwnerRepository::new(storage.clone())),
            user_repository: Arc::new(UserRepository::new(storage)),
        }
    }

    /// Owners currently linked to the device, in link order.
    pub async fn resolve_owners(&self, device_id: &str) -> Result<Vec<String>, ApiError> {
        let device_id = Device::normalize_id(device_id);

        let owners = self.device_owner_repository.find_owner_ids(&device_id).await?;
        if owners.is_empty() {
            return Err(DeviceError::DeviceNotFound.into());
        }

        Ok(owners)
    }

    /// Creates the device if needed and links `user_id` to it.
    pub async fn register(
        &self,
        user_id: &str,
        mac: &str,
        name: &str,
        location: &str,
        device_type: &str,
    ) -> Result<Device, ApiError> {
        let device_id = Device::normalize_id(mac);
        if device_id.is_empty() || name.trim().is_empty() || user_id.is_empty() {
            return Err(DeviceError::InvalidRequest.into());
        }

        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)?;

        let now = OffsetDateTime::now_utc();
        let device = Device {
            id: device_id.clone(),
            name: name.trim().to_string(),
            location: location.to_string(),
            device_type: device_type.to_string(),
            created_at: now,
        };

        let mut tx = self.device_repository.get_pool().begin().await?;
        self.device_repository.upsert(&device, &mut tx).await?;
        let link = DeviceOwner {
            device_id: device_id.clone(),
            user_id: user_id.to_string(),
            created_at: now,
        };
        self.device_owner_repository.link(&link, &mut tx).await?;
        tx.commit().await?;

        info!(device_id = %device_id, user_id = %user_id, "device registered");

        let registered = self
            .device_repository
            .find_by_id(&device_id)
            .await?
            .ok_or(DeviceError::DeviceNotFound)?;

        Ok(registered)
    }

    /// Unlinks an owner. The device row goes away with its last owner.
    pub async fn unlink(&self, mac: &str, user_id: &str) -> Result<(), ApiError> {
        let device_id = Device::normalize_id(mac);

        let mut tx = self.device_owner_repository.get_pool().begin().await?;
        let remaining = self
            .device_owner_repository
            .unlink(&device_id, user_id, &mut tx)
            .await?
            .ok_or(DeviceError::OwnerNotLinked)?;

        if remaining == 0 {
            self.device_repository.delete(&device_id, &mut tx).await?;
        }
        tx.commit().await?;

        info!(device_id = %device_id, user_id = %user_id, remaining, "device unlinked");

        Ok(())
    }

    pub async fn ensure_linked(&self, mac: &str, user_id: &str) -> Result<String, ApiError> {
        let device_id = Device::normalize_id(mac);

        if !self.device_owner_repository.exists(&device_id, user_id).await? {
            return Err(DeviceError::OwnerNotLinked.into());
        }

        Ok(device_id)
    }

    /// Devices linked to `user_id` together with all of their owners.
    pub async fn devices_of(&self, user_id: &str) -> Result<Vec<(Device, Vec<String>)>, ApiError> {
        let devices = self.device_repository.find_by_owner(user_id).await?;

        let mut result = Vec::with_capacity(devices.len());
        for device in devices {
            let owners = self.device_owner_repository.find_owner_ids(&device.id).await?;
            result.push((device, owners));
        }

        Ok(result)
    }
}
