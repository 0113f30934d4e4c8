//! Application factory
//!
//! Wires routes, middleware, and shared state into the actix application.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::{auth::JwtAuth, cors::create_cors, AccessTokenVerifier};
use crate::routes::auth::{login::login, logout::logout, refresh::refresh, AppState};
use crate::routes::profile::profile;

use kg_core::repositories::{RevocationStore, UserRepository};

/// Create and configure the application with all dependencies
pub fn create_app<U, S>(
    app_state: web::Data<AppState<U, S>>,
    verifier: web::Data<Arc<dyn AccessTokenVerifier>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    S: RevocationStore + 'static,
{
    let cors = create_cors();

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(verifier)
        // Add middleware
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(login::<U, S>))
                        .route("/refresh", web::post().to(refresh::<U, S>))
                        .route(
                            "/logout",
                            web::post().to(logout::<U, S>).wrap(JwtAuth::new()),
                        ),
                )
                .route(
                    "/profile",
                    web::get().to(profile::<U, S>).wrap(JwtAuth::new()),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "keygate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
