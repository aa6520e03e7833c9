use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Id, OwnerId};

/// Inbound trigger posted by a sensor.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorEventRequest {
    /// Hardware address of the reporting device, any casing
    pub mac: String,
    /// Message to record and forward
    #[serde(rename = "mensagem")]
    pub message: String,
}

/// Why an owner was not notified.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeReason {
    /// No schedule of the owner matched the instant, or none exist
    OutsideSchedule,
    /// The owner has no push token
    NoToken,
    /// The push transport failed or timed out
    TransportError,
    /// A store read or write failed for this owner
    StoreError,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerOutcome {
    pub owner_id: OwnerId,
    /// Identifier of the recorded event, absent if recording failed
    pub event_id: Option<Id>,
    pub recorded: bool,
    pub notified: bool,
    pub reason: Option<OutcomeReason>,
    /// Detail of a store failure
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// Aggregate result of one sensor event.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDispatchResponse {
    pub device_id: String,
    /// Owners linked to the device
    pub considered: usize,
    /// Events persisted
    pub recorded: usize,
    /// Pushes confirmed by the transport
    pub notified: usize,
    pub owners: Vec<OwnerOutcome>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Id,
    pub device_id: String,
    pub user_id: OwnerId,
    #[serde(rename = "mensagem")]
    pub message: String,
    pub notified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sensor_event_wire_names() {
        let event: SensorEventRequest =
            serde_json::from_value(json!({ "mac": "AA:BB", "mensagem": "Movimento" })).unwrap();
        assert_eq!(event.message, "Movimento");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = OwnerOutcome {
            owner_id: String::from("u1"),
            event_id: Some(7),
            recorded: true,
            notified: false,
            reason: Some(OutcomeReason::OutsideSchedule),
            error: None,
        };

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["reason"], json!("outside-schedule"));
        assert!(value.get("error").is_none());
    }
}
