mod credentials;
mod fcm;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use credentials::ServiceAccountTokens;
pub use fcm::FcmTransport;

use crate::errors::PushError;

/// Notification handed to a push transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    /// Key/value payload for client-side handling
    pub data: BTreeMap<String, String>,
}

/// Delivers a notification to the installation behind one token.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, token: &str, notification: &PushNotification) -> Result<(), PushError>;
}
