//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! runs it through the verifier held in app data, and injects the caller's
//! context into request extensions. Any failure yields the uniform 401
//! body; the reason is logged, never surfaced.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use kg_core::domain::entities::token::{Claims, TokenUse};
use kg_core::errors::DomainError;
use kg_core::repositories::RevocationStore;
use kg_core::services::token::TokenVerifier;

use crate::handlers::error::unauthorized_response;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Verified claims of the presented access token
    pub claims: Claims,
}

impl AuthContext {
    /// Creates a new authentication context from verified claims
    pub fn from_claims(claims: Claims) -> Self {
        Self { claims }
    }

    /// The token subject (user identifier)
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    /// Role names carried by the token
    pub fn roles(&self) -> &[String] {
        &self.claims.roles
    }
}

/// Trait for wrapping the token verifier to allow dynamic dispatch from
/// middleware without knowing the revocation store type
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    async fn verify_access(&self, token: &str) -> Result<Claims, DomainError>;
}

#[async_trait]
impl<S: RevocationStore> AccessTokenVerifier for TokenVerifier<S> {
    async fn verify_access(&self, token: &str) -> Result<Claims, DomainError> {
        self.verify(token, TokenUse::Access).await
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth;

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new() -> Self {
        Self
    }
}

impl Default for JwtAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Extract token from Authorization header
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Err(unauthorized_error("missing or malformed Authorization header"));
                }
            };

            let verifier = match req.app_data::<web::Data<Arc<dyn AccessTokenVerifier>>>() {
                Some(verifier) => verifier.clone(),
                None => {
                    log::error!("token verifier missing from app data");
                    return Err(unauthorized_error("verifier not configured"));
                }
            };

            match verifier.verify_access(&token).await {
                Ok(claims) => {
                    req.extensions_mut().insert(AuthContext::from_claims(claims));
                }
                Err(e) => {
                    return Err(unauthorized_error(&format!("token rejected: {}", e)));
                }
            }

            // Continue with the request
            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Builds the uniform 401 error; the reason stays in the logs
fn unauthorized_error(reason: &str) -> Error {
    log::debug!("unauthorized request: {}", reason);
    InternalError::from_response("unauthorized", unauthorized_response()).into()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| unauthorized_error("authentication context missing"));

        ready(result)
    }
}
