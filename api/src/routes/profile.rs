use actix_web::{web, HttpResponse};

use crate::dto::auth::ProfileResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;
use crate::routes::auth::AppState;

use kg_core::repositories::{RevocationStore, UserRepository};

/// Handler for GET /api/v1/profile
///
/// Representative protected endpoint: returns the account behind the
/// verified access token. Requires `Authorization: Bearer <access_token>`.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "id": "550e8400-e29b-41d4-a716-446655440000",
///     "username": "alice",
///     "roles": ["admin"],
///     "created_at": "2025-08-14T10:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid, expired, or revoked access token
pub async fn profile<U, S>(
    state: web::Data<AppState<U, S>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: RevocationStore + 'static,
{
    match state.auth_service.user_profile(auth.subject()).await {
        Ok(user) => HttpResponse::Ok().json(ProfileResponse::from(user)),
        Err(error) => handle_domain_error(&error),
    }
}
