use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::{debug, warn};

use crate::claims::{decode_claims, Claims};
use crate::retry::{with_retry, RetryConfig};

/// Errors raised while authenticating a request.
///
/// All of these map to HTTP 403 at the middleware; the variants exist for
/// logging and tests.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Invalid authentication scheme")]
    InvalidScheme,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Expired token")]
    ExpiredToken,

    #[error("Invalid token or expired token")]
    Rejected,

    #[error("Auth service unreachable: {0}")]
    Upstream(String),
}

/// Validates tokens against the external auth service, caching results in
/// Redis under the token's `jti`.
#[derive(Clone)]
pub struct RemoteValidator {
    http: reqwest::Client,
    redis: ConnectionManager,
    auth_url: String,
    cache_expiry_secs: u64,
    retry: RetryConfig,
}

impl RemoteValidator {
    pub fn new(redis: ConnectionManager, auth_url: String, cache_expiry_secs: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            redis,
            auth_url,
            cache_expiry_secs,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Ask the auth service whether the token is valid, consulting the cache
    /// first. Transport errors are retried with backoff before giving up.
    pub async fn validate(&self, token: &str, claims: &Claims) -> Result<bool, AuthError> {
        if let Some(cached) = self.from_cache(claims).await {
            debug!(jti = ?claims.jti, valid = cached, "auth cache hit");
            return Ok(cached);
        }

        let response = with_retry(&self.retry, || {
            self.http
                .get(&self.auth_url)
                .header("Authorization", format!("Bearer {token}"))
                .send()
        })
        .await
        .map_err(|e| AuthError::Upstream(e.to_string()))?;

        let valid = response.status() == reqwest::StatusCode::OK;
        self.put_cache(claims, valid).await;
        Ok(valid)
    }

    /// Cache lookups are advisory; Redis failures degrade to a remote call.
    async fn from_cache(&self, claims: &Claims) -> Option<bool> {
        let jti = claims.jti?;
        let mut conn = self.redis.clone();
        match conn.get::<_, Option<String>>(jti.to_string()).await {
            Ok(cached) => cached.map(|v| v == "1"),
            Err(e) => {
                warn!("auth cache read failed: {}", e);
                None
            }
        }
    }

    async fn put_cache(&self, claims: &Claims, valid: bool) {
        let Some(jti) = claims.jti else { return };

        let remaining = claims.remaining_lifetime(Utc::now().timestamp());
        let ttl = cache_ttl(self.cache_expiry_secs, remaining);
        if ttl == 0 {
            return;
        }

        let mut conn = self.redis.clone();
        let value = if valid { "1" } else { "0" };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(jti.to_string(), value, ttl)
            .await
        {
            warn!("auth cache write failed: {}", e);
        }
    }
}

/// Cache TTL clamped to the token's own remaining lifetime.
fn cache_ttl(configured_secs: u64, remaining_secs: i64) -> u64 {
    if remaining_secs <= 0 {
        return 0;
    }
    configured_secs.min(remaining_secs as u64)
}

/// Full token verification: local claims decode plus, when configured, the
/// remote auth-service check.
///
/// Without a `RemoteValidator` only the local decode and expiry check run
/// (development and test mode).
pub struct TokenVerifier {
    remote: Option<RemoteValidator>,
}

impl TokenVerifier {
    pub fn local_only() -> Self {
        Self { remote: None }
    }

    pub fn with_remote(remote: RemoteValidator) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode_claims(token)?;

        if let Some(remote) = &self.remote {
            if !remote.validate(token, &claims).await? {
                return Err(AuthError::Rejected);
            }
        }

        Ok(claims)
    }
}
