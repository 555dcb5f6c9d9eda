//! # Bearer Auth Library
//!
//! Bearer-token authentication for UGC Actix services.
//!
//! Tokens are decoded locally (claims + expiry only; the external auth service
//! is the signing authority) and then validated against that service, with the
//! boolean result cached in Redis under the token's `jti`.
//!
//! ## Modules
//! - `claims`: JWT claims decoding
//! - `middleware`: Actix authentication middleware and `UserId` extractor
//! - `retry`: exponential backoff for the remote validation call
//! - `verifier`: remote token validation with Redis caching

pub mod claims;
pub mod middleware;
pub mod retry;
pub mod verifier;

pub use claims::{decode_claims, Claims};
pub use middleware::{BearerAuthMiddleware, UserId};
pub use retry::{with_retry, RetryConfig};
pub use verifier::{AuthError, RemoteValidator, TokenVerifier};
