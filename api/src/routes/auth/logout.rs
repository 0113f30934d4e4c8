use actix_web::{web, HttpResponse};

use crate::dto::auth::{LogoutRequest, LogoutResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use kg_core::repositories::{RevocationStore, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented access token for its remaining lifetime, and the
/// refresh token too when the body carries one. Requires authentication
/// via Bearer token in the Authorization header.
///
/// # Request Body (optional)
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
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 401 Unauthorized: Revocation store unavailable (fail closed)
pub async fn logout<U, S>(
    state: web::Data<AppState<U, S>>,
    auth: AuthContext,
    request: Option<web::Json<LogoutRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: RevocationStore + 'static,
{
    let body = request.map(|json| json.into_inner()).unwrap_or_default();

    match state
        .auth_service
        .logout(&auth.claims, body.refresh_token.as_deref())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
