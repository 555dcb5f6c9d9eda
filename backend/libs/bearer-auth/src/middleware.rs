use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::verifier::{AuthError, TokenVerifier};

/// User ID extracted from the bearer token
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

/// Bearer Authentication Middleware
///
/// Rejects requests without a valid bearer token with HTTP 403 and inserts
/// the token subject into request extensions as [`UserId`].
pub struct BearerAuthMiddleware {
    verifier: Arc<TokenVerifier>,
}

impl BearerAuthMiddleware {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct BearerAuthMiddlewareService<S> {
    service: Rc<S>,
    verifier: Arc<TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| forbidden(AuthError::MissingCredentials))?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| forbidden(AuthError::InvalidScheme))?;

            let claims = verifier.verify(token).await.map_err(|e| {
                tracing::warn!("token validation failed: {}", e);
                forbidden(e)
            })?;

            req.extensions_mut().insert(UserId(claims.sub));

            service.call(req).await
        })
    }
}

fn forbidden(err: AuthError) -> Error {
    actix_web::error::ErrorForbidden(err.to_string())
}

/// FromRequest implementation for UserId
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(actix_web::error::ErrorForbidden(
                "User not authenticated",
            ))),
        }
    }
}
