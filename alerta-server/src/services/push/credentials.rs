use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

use crate::configs::Push;
use crate::errors::PushError;

const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens closer than this to expiry are replaced before use
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Mints OAuth2 access tokens for a service account and keeps the current
/// one until it is about to expire.
pub struct ServiceAccountTokens {
    client: Client,
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    pub fn new(client: Client, push: &Push) -> Result<Self, PushError> {
        if push.client_email.trim().is_empty() {
            return Err(PushError::MissingCredentials("client_email"));
        }
        if push.private_key.trim().is_empty() {
            return Err(PushError::MissingCredentials("private_key"));
        }

        let key = EncodingKey::from_rsa_pem(push.private_key.as_bytes())?;

        Ok(Self {
            client,
            client_email: push.client_email.clone(),
            token_uri: push.token_uri.clone(),
            key,
            cached: Mutex::new(None),
        })
    }

    pub async fn access_token(&self) -> Result<String, PushError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange().await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    fn assertion(&self) -> Result<String, PushError> {
        let iat = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: MESSAGING_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }

    async fn exchange(&self) -> Result<CachedToken, PushError> {
        let assertion = self.assertion()?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
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

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "access token refreshed");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(client_email: &str, private_key: &str) -> Push {
        Push {
            endpoint: String::from("https://fcm.googleapis.com/v1/projects/{project_id}/messages:send"),
            project_id: String::from("alerta-seguro"),
            client_email: client_email.to_string(),
            private_key: private_key.to_string(),
            token_uri: String::from("https://oauth2.googleapis.com/token"),
            title: String::from("Alerta de Movimento"),
            timeout_ms: 5000,
        }
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let key = include_str!("../../../tests/fixtures/service_account_key.pem");

        assert!(matches!(
            ServiceAccountTokens::new(Client::new(), &push("", key)),
            Err(PushError::MissingCredentials("client_email"))
        ));
        assert!(matches!(
            ServiceAccountTokens::new(Client::new(), &push("push@alerta.iam.gserviceaccount.com", "")),
            Err(PushError::MissingCredentials("private_key"))
        ));
    }

    #[test]
    fn test_malformed_private_key_is_rejected() {
        let result = ServiceAccountTokens::new(
            Client::new(),
            &push("push@alerta.iam.gserviceaccount.com", "not a pem key"),
        );

        assert!(matches!(result, Err(PushError::Credentials(_))));
    }
}
