use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use crate::auth::{
    jwt_auth_middleware, rate_limit_middleware, Account, AuthService, LoginRequest, LoginResponse,
    MessageResponse, RateLimiter, RefreshTokenRequest, RegisterTrainerRequest,
    RegisterTrainerResponse, RegisterUserRequest, RegisterUserResponse, TokenResponse, UserSession,
};
use crate::error::{ApiError, ApiResult};

/// Authentication routes
pub fn auth_routes(auth_service: AuthService, rate_limiter: RateLimiter) -> Router {
    let credentials = Router::new()
        .route("/registro/usuario", post(register_user))
        .route("/registro/personal", post(register_trainer))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route_layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let session = Router::new()
        .route("/logout", post(logout))
        .route("/perfil", get(get_profile))
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            jwt_auth_middleware,
        ));

    credentials.merge(session).with_state(auth_service)
}

/// Register a regular user account
#[tracing::instrument(skip(auth_service, request))]
async fn register_user(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterUserRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<RegisterUserResponse>)> {
    let response = auth_service.register_user(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Register a personal trainer account
#[tracing::instrument(skip(auth_service, request))]
async fn register_trainer(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterTrainerRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<RegisterTrainerResponse>)> {
    let response = auth_service.register_trainer(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip(auth_service, request))]
async fn login(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Json<LoginResponse>> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new access token
#[tracing::instrument(skip(auth_service, request))]
async fn refresh_token(
    State(auth_service): State<AuthService>,
    WithRejection(Json(request), _): WithRejection<Json<RefreshTokenRequest>, ApiError>,
) -> ApiResult<Json<TokenResponse>> {
    let response = auth_service.refresh_token(request).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(auth_service, session), fields(account_id = session.account_id))]
async fn logout(
    State(auth_service): State<AuthService>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<MessageResponse>> {
    let response = auth_service.logout(&session).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(auth_service, session), fields(account_id = session.account_id))]
async fn get_profile(
    State(auth_service): State<AuthService>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Account>> {
    let account = auth_service.get_account(session.account_id).await?;
    Ok(Json(account))
}
