//! Maps domain errors onto HTTP responses.
//!
//! Every verification or credential failure collapses into the same 401
//! body; the concrete reason is only logged. Distinct 401 messages would
//! let a caller probe which check a forged token failed.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use kg_core::errors::DomainError;
use kg_shared::types::ErrorResponse;

/// The uniform 401 payload used for every authentication failure
pub fn unauthorized_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        "unauthorized",
        "Authentication required",
    ))
}

/// Converts a domain error into its HTTP response
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    if error.is_unauthorized() {
        log::debug!("request rejected: {}", error);
        return unauthorized_response();
    }

    match error {
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation_error", message)),
        _ => {
            log::error!("internal error: {}", error);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                "An internal error occurred",
            ))
        }
    }
}

/// Converts request-body validation failures into a 400 response
pub fn handle_validation_error(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    HttpResponse::BadRequest().json(
        ErrorResponse::new("validation_error", "Invalid request body")
            .with_detail("fields", serde_json::json!(fields)),
    )
}
