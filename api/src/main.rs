use std::env;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{error, info, warn};

use kg_api::app::create_app;
use kg_api::middleware::AccessTokenVerifier;
use kg_api::routes::auth::AppState;

use kg_core::domain::entities::User;
use kg_core::repositories::{InMemoryRevocationStore, InMemoryUserRepository, RevocationStore};
use kg_core::services::auth::AuthService;
use kg_core::services::token::{
    RefreshCoordinator, TokenCleanupConfig, TokenCleanupService, TokenIssuer, TokenVerifier,
};
use kg_infra::RedisRevocationStore;
use kg_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Keygate API Server");

    let config = AppConfig::from_env();

    if config.environment.is_production() && config.jwt.is_using_default_secret() {
        error!("JWT_SECRET must be configured in production");
        return Err(std::io::Error::other("JWT_SECRET not configured"));
    }

    let users = seed_users(&config).await;

    // The revocation store backend is selected at startup; Redis shares
    // revocations across instances, memory suits a single node
    let backend = env::var("REVOCATION_BACKEND").unwrap_or_else(|_| "memory".to_string());
    match backend.as_str() {
        "redis" => {
            let store = RedisRevocationStore::new(config.cache.clone())
                .await
                .map_err(std::io::Error::other)?;
            run_server(Arc::new(store), users, config).await
        }
        "memory" => run_server(Arc::new(InMemoryRevocationStore::new()), users, config).await,
        other => {
            error!("Unknown REVOCATION_BACKEND '{}'", other);
            Err(std::io::Error::other("unknown revocation backend"))
        }
    }
}

/// Builds the service graph around the chosen revocation store and serves
/// requests until shutdown
async fn run_server<S: RevocationStore + 'static>(
    store: Arc<S>,
    users: Arc<InMemoryUserRepository>,
    config: AppConfig,
) -> std::io::Result<()> {
    let issuer = Arc::new(TokenIssuer::new(config.jwt.clone()));
    let verifier = Arc::new(TokenVerifier::new(&config.jwt, store.clone()));
    let coordinator = Arc::new(RefreshCoordinator::new(
        issuer.clone(),
        verifier.clone(),
        store.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        users,
        issuer,
        verifier.clone(),
        coordinator,
        store.clone(),
    ));

    // Reclaim expired revocation entries in the background
    let cleanup = Arc::new(TokenCleanupService::new(
        store,
        TokenCleanupConfig::default(),
    ));
    cleanup.start_background_task();

    let app_state = web::Data::new(AppState { auth_service });
    let verifier_data: web::Data<Arc<dyn AccessTokenVerifier>> =
        web::Data::new(verifier as Arc<dyn AccessTokenVerifier>);

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone(), verifier_data.clone()))
        .bind(&bind_address)?
        .run()
        .await
}

/// Provisions the account store from environment variables
///
/// `BOOTSTRAP_USERNAME` / `BOOTSTRAP_PASSWORD` (and optionally
/// `BOOTSTRAP_ROLES`, comma-separated) seed one account. Without them a
/// development server gets the usual admin/admin account; a production
/// server starts empty and every login fails until an account exists.
async fn seed_users(config: &AppConfig) -> Arc<InMemoryUserRepository> {
    let repository = Arc::new(InMemoryUserRepository::new());

    match (env::var("BOOTSTRAP_USERNAME"), env::var("BOOTSTRAP_PASSWORD")) {
        (Ok(username), Ok(password)) => {
            let roles: Vec<String> = env::var("BOOTSTRAP_ROLES")
                .map(|r| {
                    r.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            match User::create(&username, &password, roles) {
                Ok(user) => {
                    info!("Seeded bootstrap account '{}'", username);
                    repository.insert(user).await;
                }
                Err(e) => error!("Failed to seed bootstrap account: {}", e),
            }
        }
        _ if config.environment.is_development() => {
            warn!("No bootstrap account configured; seeding development account 'admin'");
            if let Ok(user) = User::create("admin", "admin", vec!["admin".to_string()]) {
                repository.insert(user).await;
            }
        }
        _ => {
            warn!("No bootstrap account configured; all logins will fail until one is provisioned");
        }
    }

    repository
}
