//! Tests for the bearer-token middleware on protected endpoints.

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use serde_json::{json, Value};

use kg_api::app::create_app;
use kg_api::middleware::AccessTokenVerifier;
use kg_api::routes::auth::AppState;

use kg_core::domain::entities::User;
use kg_core::repositories::{InMemoryRevocationStore, InMemoryUserRepository};
use kg_core::services::auth::AuthService;
use kg_core::services::token::{RefreshCoordinator, TokenIssuer, TokenVerifier};

use kg_shared::config::JwtConfig;

type TestAppState = AppState<InMemoryUserRepository, InMemoryRevocationStore>;

async fn test_state() -> (web::Data<TestAppState>, web::Data<Arc<dyn AccessTokenVerifier>>) {
    let config = JwtConfig::new("middleware-test-secret");

    let store = Arc::new(InMemoryRevocationStore::new());
    let issuer = Arc::new(TokenIssuer::new(config.clone()));
    let verifier = Arc::new(TokenVerifier::new(&config, store.clone()));
    let coordinator = Arc::new(RefreshCoordinator::new(
        issuer.clone(),
        verifier.clone(),
        store.clone(),
    ));

    let repository = Arc::new(InMemoryUserRepository::new());
    let hash = bcrypt::hash("123", 4).unwrap();
    repository.insert(User::new("Abc", hash, Vec::new())).await;

    let auth_service = Arc::new(AuthService::new(
        repository,
        issuer,
        verifier.clone(),
        coordinator,
        store,
    ));

    let state = web::Data::new(AppState { auth_service });
    let verifier_data: web::Data<Arc<dyn AccessTokenVerifier>> =
        web::Data::new(verifier as Arc<dyn AccessTokenVerifier>);
    (state, verifier_data)
}

fn login_request() -> actix_web::test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": "Abc", "password": "123"}))
}

#[actix_rt::test]
async fn test_protected_route_requires_header() {
    let (state, verifier) = test_state().await;
    let app = test::init_service(create_app(state, verifier)).await;

    let req = test::TestRequest::get().uri("/api/v1/profile").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_protected_route_rejects_non_bearer_scheme() {
    let (state, verifier) = test_state().await;
    let app = test::init_service(create_app(state, verifier)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", "Basic QWJjOjEyMw=="))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_protected_route_rejects_garbage_token() {
    let (state, verifier) = test_state().await;
    let app = test::init_service(create_app(state, verifier)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_protected_route_rejects_refresh_token() {
    let (state, verifier) = test_state().await;
    let app = test::init_service(create_app(state, verifier)).await;

    let tokens: Value =
        test::read_body_json(test::call_service(&app, login_request().to_request()).await).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    // A refresh token is never accepted by resource endpoints, even though
    // its signature is genuine
    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", format!("Bearer {}", refresh_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_middleware_failures_share_one_body() {
    let (state, verifier) = test_state().await;
    let app = test::init_service(create_app(state, verifier)).await;

    let tokens: Value =
        test::read_body_json(test::call_service(&app, login_request().to_request()).await).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();

    let missing = test::TestRequest::get().uri("/api/v1/profile").to_request();
    let garbage = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", "Bearer junk"))
        .to_request();
    let wrong_use = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", format!("Bearer {}", refresh_token)))
        .to_request();

    let mut bodies = Vec::new();
    for req in [missing, garbage, wrong_use] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        bodies.push((body["error"].clone(), body["message"].clone()));
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[actix_rt::test]
async fn test_authenticated_request_passes_through() {
    let (state, verifier) = test_state().await;
    let app = test::init_service(create_app(state, verifier)).await;

    let tokens: Value =
        test::read_body_json(test::call_service(&app, login_request().to_request()).await).await;
    let access_token = tokens["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header(("Authorization", format!("Bearer {}", access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
