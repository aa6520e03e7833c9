use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use alerta_api::OutcomeReason;
use sqlx::Error;
use tracing::{debug, warn};

use super::push::{PushNotification, PushTransport};
use crate::errors::PushError;
use crate::repositories::UserRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryResult {
    pub sent: bool,
    pub reason: Option<OutcomeReason>,
}

impl DeliveryResult {
    pub fn sent() -> Self {
        Self { sent: true, reason: None }
    }

    pub fn not_sent(reason: OutcomeReason) -> Self {
        Self { sent: false, reason: Some(reason) }
    }
}

/// Looks up an owner's push token and hands the alert to the transport.
#[derive(Clone)]
pub struct NotificationDispatcher {
    user_repository: Arc<UserRepository>,
    transport: Arc<dyn PushTransport>,
    title: String,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        user_repository: Arc<UserRepository>,
        transport: Arc<dyn PushTransport>,
        title: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            user_repository,
            transport,
            title: title.into(),
            timeout,
        }
    }

    /// Only a failed token lookup is an error; a missing token or a failed
    /// send are ordinary outcomes.
    pub async fn dispatch(
        &self,
        owner_id: &str,
        device_id: &str,
        message: &str,
    ) -> Result<DeliveryResult, Error> {
        let Some(token) = self.user_repository.find_push_token(owner_id).await? else {
            debug!(owner_id = %owner_id, "owner has no push token");
            return Ok(DeliveryResult::not_sent(OutcomeReason::NoToken));
        };

        let notification = PushNotification {
            title: self.title.clone(),
            body: message.to_string(),
            data: BTreeMap::from([
                ("mac".to_string(), device_id.to_string()),
                ("mensagem".to_string(), message.to_string()),
            ]),
        };

        let sent = match tokio::time::timeout(self.timeout, self.transport.send(&token, &notification)).await {
            Ok(result) => result,
            Err(_) => Err(PushError::Timeout(self.timeout.as_millis() as u64)),
        };

        match sent {
            Ok(()) => Ok(DeliveryResult::sent()),
            Err(e) => {
                warn!(owner_id = %owner_id, device_id = %device_id, "push delivery failed: {}", e);
                Ok(DeliveryResult::not_sent(OutcomeReason::TransportError))
            }
        }
    }
}
