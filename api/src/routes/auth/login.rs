use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::{handle_domain_error, handle_validation_error};

use kg_core::repositories::{RevocationStore, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates credentials and issues an access/refresh token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "string",
///     "password": "string"
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
/// - 400 Bad Request: Malformed request body
/// - 401 Unauthorized: Unknown user or wrong password (indistinguishable)
/// - 500 Internal Server Error: Token issuance failure
pub async fn login<U, S>(
    state: web::Data<AppState<U, S>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: RevocationStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }

    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(&error),
    }
}
