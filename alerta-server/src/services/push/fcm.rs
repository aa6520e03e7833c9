use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{PushNotification, PushTransport, ServiceAccountTokens};
use crate::configs::Push;
use crate::errors::PushError;

/// Firebase Cloud Messaging HTTP v1 client.
pub struct FcmTransport {
    client: Client,
    endpoint: String,
    tokens: ServiceAccountTokens,
}

impl FcmTransport {
    /// Fails when the service account credentials are missing or the
    /// private key does not parse.
    pub fn new(push: &Push) -> Result<Self, PushError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(push.timeout_ms))
            .build()?;

        Ok(Self {
            tokens: ServiceAccountTokens::new(client.clone(), push)?,
            endpoint: push.endpoint.replace("{project_id}", &push.project_id),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn message_body(token: &str, notification: &PushNotification) -> Value {
        json!({
            "message": {
                "token": token,
                "notification": {
                    "title": notification.title,
                    "body": notification.body,
                },
                "data": notification.data,
            }
        })
    }
}

#[async_trait]
impl PushTransport for FcmTransport {
    async fn send(&self, token: &str, notification: &PushNotification) -> Result<(), PushError> {
        let access_token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&access_token)
            .json(&Self::message_body(token, notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("push accepted by {}", self.endpoint);

        Ok(())
    }
}
