use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::OwnerId;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDeviceRequest {
    /// Owner to link the device to
    pub uid: Option<OwnerId>,
    /// Hardware address reported by the sensor
    pub mac: Option<String>,
    /// Display name
    #[serde(rename = "nome")]
    pub name: Option<String>,
    /// Free-form location tag
    #[serde(rename = "localizacao", default)]
    pub location: String,
    /// Free-form device type
    #[serde(rename = "tipo", default)]
    pub device_type: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfoResponse {
    /// Normalised hardware address
    pub mac: String,
    /// Display name
    pub name: String,
    /// Location tag
    pub location: String,
    /// Device type
    pub device_type: String,
    /// Registration time
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Every owner linked to the device
    pub owners: Vec<OwnerId>,
}
