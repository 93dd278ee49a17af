use std::time::{Duration, Instant};

use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header,
    jwk::{Jwk, JwkSet},
};
use reqwest::{Client, header::CACHE_CONTROL};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::{
    authentication::{ports::IdentityVerifier, value_objects::Identity},
    common::entities::app_errors::CoreError,
};

const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const DEFAULT_KEYS_TTL: Duration = Duration::from_secs(3600);
/// An unknown kid triggers at most one refetch per interval.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
}

#[derive(Debug)]
struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
    expires_at: Instant,
}

#[derive(Debug)]
enum KeyLookup {
    Found(Jwk),
    Unknown,
    Refetch,
}

fn lookup_key(cached: Option<&CachedKeys>, kid: &str, now: Instant) -> KeyLookup {
    let Some(cached) = cached else {
        return KeyLookup::Refetch;
    };

    if cached.expires_at <= now {
        return KeyLookup::Refetch;
    }

    if let Some(jwk) = cached.keys.find(kid) {
        return KeyLookup::Found(jwk.clone());
    }

    if now < cached.fetched_at + MIN_REFETCH_INTERVAL {
        KeyLookup::Unknown
    } else {
        KeyLookup::Refetch
    }
}

/// Verifies Firebase ID tokens against Google's published signing keys.
#[derive(Debug)]
pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    client: Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: String, client: Client) -> Self {
        Self {
            project_id,
            jwks_url: SECURETOKEN_JWKS_URL.to_string(),
            client,
            keys: RwLock::new(None),
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
        validation
    }

    /// The key for `kid`. The set is refetched when it expired, or when it
    /// does not know the kid and was not fetched within the last minute.
    async fn signing_key(&self, kid: &str) -> Result<Jwk, CoreError> {
        match lookup_key(self.keys.read().await.as_ref(), kid, Instant::now()) {
            KeyLookup::Found(jwk) => return Ok(jwk),
            KeyLookup::Unknown => return Err(unknown_kid(kid)),
            KeyLookup::Refetch => {}
        }

        let mut keys = self.keys.write().await;

        // Another request may have refreshed the set while we waited.
        match lookup_key(keys.as_ref(), kid, Instant::now()) {
            KeyLookup::Found(jwk) => return Ok(jwk),
            KeyLookup::Unknown => return Err(unknown_kid(kid)),
            KeyLookup::Refetch => {}
        }

        let fresh = self.fetch_keys().await?;
        let jwk = fresh.keys.find(kid).cloned();
        *keys = Some(fresh);

        jwk.ok_or_else(|| unknown_kid(kid))
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, CoreError> {
        let response = self.client.get(&self.jwks_url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch Firebase signing keys: {}", e);
            CoreError::InvalidToken
        })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "Firebase signing keys unavailable");
            return Err(CoreError::InvalidToken);
        }

        let ttl = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .and_then(max_age)
            .unwrap_or(DEFAULT_KEYS_TTL);

        let keys: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Firebase signing keys: {}", e);
            CoreError::InvalidToken
        })?;

        let fetched_at = Instant::now();

        Ok(CachedKeys {
            keys,
            fetched_at,
            expires_at: fetched_at + ttl,
        })
    }
}

fn unknown_kid(kid: &str) -> CoreError {
    tracing::debug!(kid, "token signed with an unknown key");
    CoreError::InvalidToken
}

/// `max-age` of a Cache-Control header.
fn max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|seconds| seconds.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: String) -> Result<Identity, CoreError> {
        let header = decode_header(&token).map_err(|_| CoreError::InvalidToken)?;
        if header.alg != Algorithm::RS256 {
            return Err(CoreError::InvalidToken);
        }
        let kid = header.kid.ok_or(CoreError::InvalidToken)?;

        let jwk = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_jwk(&jwk).map_err(|_| CoreError::InvalidToken)?;

        let data = decode::<FirebaseClaims>(&token, &decoding_key, &self.validation()).map_err(
            |e| {
                tracing::debug!("Rejected ID token: {}", e);
                CoreError::InvalidToken
            },
        )?;

        Identity::new(data.claims.sub).ok_or(CoreError::InvalidToken)
    }
}
