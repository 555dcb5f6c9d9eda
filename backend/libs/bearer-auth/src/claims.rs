use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::verifier::AuthError;

/// Claims carried by an auth-service bearer token.
///
/// `jti` is optional; tokens without it are still accepted but their
/// validation result cannot be cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Expiry as a unix timestamp
    pub exp: i64,
    /// Token id, used as the Redis cache key
    #[serde(default)]
    pub jti: Option<Uuid>,
}

impl Claims {
    /// Seconds until the token expires, negative when already expired.
    pub fn remaining_lifetime(&self, now: i64) -> i64 {
        self.exp - now
    }
}

/// Decode token claims without verifying the signature.
///
/// The external auth service is the authority on token validity; locally we
/// only need the claims and the expiry check.
pub fn decode_claims(token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims = ["exp".to_string()].into_iter().collect();
    validation.validate_exp = true;

    let token_data =
        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

    Ok(token_data.claims)
}
