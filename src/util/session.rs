use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AuthConfig;

/// Authenticated caller as reported by the external session provider.
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No session found")]
    NoSession,

    #[error("Session provider error: {0}")]
    Provider(String),
}

/// Seam between the admin guard and the external OAuth/session
/// provider. Production resolves bearer tokens against the provider's
/// userinfo endpoint; tests substitute a stub.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal, SessionError>;
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: String,
    #[serde(rename = "isAdmin", default)]
    is_admin: bool,
}

/// Verifies sessions by calling the provider's userinfo endpoint with
/// the caller's bearer token.
pub struct OAuthSessionVerifier {
    client: reqwest::Client,
    userinfo_url: String,
}

impl OAuthSessionVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, userinfo_url: config.userinfo_url.clone() })
    }
}

#[async_trait]
impl SessionVerifier for OAuthSessionVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, SessionError> {
        if token.is_empty() {
            return Err(SessionError::NoSession);
        }

        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!("Session provider unreachable: {}", e);
                SessionError::Provider(e.to_string())
            })?;

        if !response.status().is_success() {
            debug!("Session provider rejected token: {}", response.status());
            return Err(SessionError::NoSession);
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Provider(format!("Invalid userinfo body: {}", e)))?;

        Ok(Principal { email: info.email, is_admin: info.is_admin })
    }
}
