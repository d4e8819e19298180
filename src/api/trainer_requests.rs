use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use sqlx::PgPool;

use crate::auth::{jwt_auth_middleware, trainer_only_middleware, AuthService, UserSession};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateTrainerRequest, CreateTrainerRequestsResponse, CreateWorkoutPlanRequest,
    PendingTrainerRequest, RespondTrainerRequestResponse, TrainerListing, TrainerRequestResponse,
};
use crate::services::TrainerRequestService;

pub fn trainer_request_routes(db: PgPool, auth_service: AuthService) -> Router {
    let request_service = TrainerRequestService::new(db);

    // route_layer order: the JWT layer is outermost so the session exists for the role check
    let trainer_only = Router::new()
        .route("/pendentes", get(pending_requests))
        .route("/responder/:solicitacao_id", post(respond_request))
        .route("/recusar/:solicitacao_id", put(reject_request))
        .route_layer(middleware::from_fn(trainer_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            jwt_auth_middleware,
        ));

    let authenticated = Router::new()
        .route("/criar-solicitacao", post(create_requests))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware));

    let public = Router::new().route("/personal-trainers", get(list_trainers));

    trainer_only
        .merge(authenticated)
        .merge(public)
        .with_state(request_service)
}

#[tracing::instrument(skip(service))]
async fn list_trainers(State(service): State<TrainerRequestService>) -> ApiResult<Json<Vec<TrainerListing>>> {
    let trainers = service.list_trainers().await?;
    Ok(Json(trainers))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn create_requests(
    State(service): State<TrainerRequestService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateTrainerRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<CreateTrainerRequestsResponse>)> {
    let solicitacoes = service.create_requests(session.account_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTrainerRequestsResponse {
            message: "Requests created successfully.".to_string(),
            solicitacoes,
        }),
    ))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn pending_requests(
    State(service): State<TrainerRequestService>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<Vec<PendingTrainerRequest>>> {
    let pending = service.pending_for_trainer(session.account_id).await?;
    Ok(Json(pending))
}

/// Answer a request with a plan built for the requester
#[tracing::instrument(skip(service, session, plan), fields(account_id = session.account_id))]
async fn respond_request(
    State(service): State<TrainerRequestService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(request_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(plan), _): WithRejection<Json<CreateWorkoutPlanRequest>, ApiError>,
) -> ApiResult<Json<RespondTrainerRequestResponse>> {
    let (solicitacao, plan) = service.respond(&session, request_id, plan).await?;
    Ok(Json(RespondTrainerRequestResponse {
        message: "Request answered and workout plan created successfully.".to_string(),
        solicitacao,
        plan,
    }))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn reject_request(
    State(service): State<TrainerRequestService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(request_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<TrainerRequestResponse>> {
    let solicitacao = service.reject(&session, request_id).await?;
    Ok(Json(TrainerRequestResponse {
        message: "Request rejected.".to_string(),
        solicitacao,
    }))
}
