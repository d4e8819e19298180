use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use sqlx::PgPool;

use crate::auth::{jwt_auth_middleware, AuthService, MessageResponse, UserSession};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreatePerformanceLog, CreateProgressLog, PerformanceLog, PerformanceLogResponse, ProgressLog,
    ProgressLogResponse, UpdatePerformanceLog, UpdateProgressLog,
};
use crate::services::ProgressService;

/// Progress and performance log routes; all require a session
pub fn progress_routes(db: PgPool, auth_service: AuthService) -> Router {
    let progress_service = ProgressService::new(db);

    Router::new()
        .route("/progress", get(list_progress).post(create_progress))
        .route("/progress/:id", put(update_progress).delete(delete_progress))
        .route(
            "/performance-logs",
            get(list_performance_logs).post(create_performance_log),
        )
        .route(
            "/performance-logs/:id",
            put(update_performance_log).delete(delete_performance_log),
        )
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(progress_service)
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn create_progress(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateProgressLog>, ApiError>,
) -> ApiResult<(StatusCode, Json<ProgressLogResponse>)> {
    let progresso = service.create_progress(session.account_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProgressLogResponse {
            message: "Progress log created successfully.".to_string(),
            progresso,
        }),
    ))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn list_progress(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<ProgressLog>>> {
    let logs = service.list_progress(session.account_id).await?;
    Ok(Json(logs))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn update_progress(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(progress_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProgressLog>, ApiError>,
) -> ApiResult<Json<ProgressLogResponse>> {
    let progresso = service.update_progress(session.account_id, progress_id, request).await?;
    Ok(Json(ProgressLogResponse {
        message: "Progress log updated successfully.".to_string(),
        progresso,
    }))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn delete_progress(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(progress_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    service.delete_progress(session.account_id, progress_id).await?;
    Ok(Json(MessageResponse::new("Progress log deleted successfully.")))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn create_performance_log(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreatePerformanceLog>, ApiError>,
) -> ApiResult<(StatusCode, Json<PerformanceLogResponse>)> {
    let log = service.create_performance_log(session.account_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(PerformanceLogResponse {
            message: "Performance log created successfully.".to_string(),
            log,
        }),
    ))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn list_performance_logs(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<PerformanceLog>>> {
    let logs = service.list_performance_logs(session.account_id).await?;
    Ok(Json(logs))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn update_performance_log(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(log_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdatePerformanceLog>, ApiError>,
) -> ApiResult<Json<PerformanceLogResponse>> {
    let log = service.update_performance_log(session.account_id, log_id, request).await?;
    Ok(Json(PerformanceLogResponse {
        message: "Performance log updated successfully.".to_string(),
        log,
    }))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn delete_performance_log(
    State(service): State<ProgressService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(log_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    service.delete_performance_log(session.account_id, log_id).await?;
    Ok(Json(MessageResponse::new("Performance log deleted successfully.")))
}
