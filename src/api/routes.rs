use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::health::health_check;
use super::nutrition::nutrition_routes;
use super::progress::progress_routes;
use super::trainer_requests::trainer_request_routes;
use super::workout_plans::workout_plan_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService, RateLimiter};
use crate::config::AppConfig;

pub fn create_routes(db: PgPool, config: &AppConfig) -> Router {
    let auth_service = AuthService::with_token_lifetime(
        db.clone(),
        &config.jwt_secret,
        config.access_token_lifetime(),
    );
    let rate_limiter = RateLimiter::new(
        config.login_rate_limit,
        std::time::Duration::from_secs(config.login_rate_window_secs),
    );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_service.clone(), rate_limiter))
        .nest("/api/refeicoes", nutrition_routes(db.clone(), auth_service.clone()))
        .nest("/api/data", progress_routes(db.clone(), auth_service.clone()))
        .nest("/api/planos", workout_plan_routes(db.clone(), auth_service.clone()))
        .nest("/api/solicitacao", trainer_request_routes(db, auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
}
