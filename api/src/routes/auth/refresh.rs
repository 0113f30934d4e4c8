use actix_web::{web, HttpResponse};

use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;

use kg_core::repositories::{RevocationStore, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a valid refresh token for a new access token. Depending on
/// the configured rotation policy the refresh token in the response is a
/// new one (the presented token is revoked) or the presented one.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "expires_in": 900,
///     "token_type": "Bearer"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Invalid, expired, or revoked refresh token
/// - 500 Internal Server Error: Token issuance failure
pub async fn refresh<U, S>(
    state: web::Data<AppState<U, S>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: RevocationStore + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(response) => HttpResponse::Ok().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(&error),
    }
}
