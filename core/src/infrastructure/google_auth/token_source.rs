use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::infrastructure::google_auth::{CLOUD_PLATFORM_SCOPE, GoogleAuthError};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// The fields of a service account key file that the token exchange needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, GoogleAuthError> {
        let key: Self = serde_json::from_str(raw)
            .map_err(|e| GoogleAuthError::InvalidCredentials(e.to_string()))?;

        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(GoogleAuthError::InvalidCredentials(
                "client_email and private_key are required".to_string(),
            ));
        }

        EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| GoogleAuthError::InvalidCredentials(format!("private_key: {e}")))?;

        Ok(key)
    }

    pub async fn from_file(path: &Path) -> Result<Self, GoogleAuthError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            GoogleAuthError::InvalidCredentials(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .checked_duration_since(Instant::now())
            .is_some_and(|left| left > REFRESH_MARGIN)
    }
}

/// OAuth access tokens for Google APIs. `Anonymous` is used against local
/// emulators and never sends an Authorization header.
#[derive(Debug, Clone)]
pub enum GoogleTokenSource {
    ServiceAccount(Arc<ServiceAccountTokenSource>),
    Anonymous,
}

impl GoogleTokenSource {
    pub fn service_account(key: ServiceAccountKey, client: Client) -> Self {
        GoogleTokenSource::ServiceAccount(Arc::new(ServiceAccountTokenSource {
            key,
            client,
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            cached: RwLock::new(None),
        }))
    }

    /// `None` means no token should be sent.
    pub async fn access_token(&self) -> Result<Option<String>, GoogleAuthError> {
        match self {
            GoogleTokenSource::ServiceAccount(source) => source.access_token().await.map(Some),
            GoogleTokenSource::Anonymous => Ok(None),
        }
    }
}

#[derive(Debug)]
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    client: Client,
    scope: String,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, GoogleAuthError> {
        if let Some(token) = self.cached.read().await.as_ref()
            && token.is_fresh()
        {
            return Ok(token.value.clone());
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref()
            && token.is_fresh()
        {
            return Ok(token.value.clone());
        }

        let token = self.exchange().await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    fn assertion(&self) -> Result<String, GoogleAuthError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| GoogleAuthError::Signing(e.to_string()))?;

        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .map_err(|e| GoogleAuthError::Signing(e.to_string()))
    }

    async fn exchange(&self) -> Result<CachedToken, GoogleAuthError> {
        let assertion = self.assertion()?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token endpoint request failed: {}", e);
                GoogleAuthError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Token endpoint rejected the assertion: {}", body);
            return if status.is_server_error() {
                Err(GoogleAuthError::Transport(format!("{status}: {body}")))
            } else {
                Err(GoogleAuthError::Rejected(format!("{status}: {body}")))
            };
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GoogleAuthError::Transport(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        tracing::debug!(expires_in = lifetime.as_secs(), "obtained google access token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_source_sends_no_token() {
        let token = GoogleTokenSource::Anonymous.access_token().await;
        assert_eq!(token, Ok(None));
    }

    #[test]
    fn test_key_without_private_key_is_rejected() {
        let result = ServiceAccountKey::from_json(
            r#"{"client_email": "svc@project.iam.gserviceaccount.com", "private_key": ""}"#,
        );
        assert!(matches!(result, Err(GoogleAuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_garbage_key_is_rejected() {
        let result = ServiceAccountKey::from_json("not json");
        assert!(matches!(result, Err(GoogleAuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_cached_token_needs_margin() {
        let stale = CachedToken {
            value: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(30),
        };
        let fresh = CachedToken {
            value: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(600),
        };

        assert!(!stale.is_fresh());
        assert!(fresh.is_fresh());
    }
}
