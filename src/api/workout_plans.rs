use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use sqlx::PgPool;

use crate::auth::{jwt_auth_middleware, AuthService, MessageResponse, UserSession};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateWorkoutPlanRequest, CreateWorkoutPlanResponse, Exercise, ExerciseVideo,
    PlanExerciseLink, PlanTrainingTypeLink, TrainingType, Weekday, WorkoutPlanSummary,
};
use crate::services::WorkoutPlanService;

pub fn workout_plan_routes(db: PgPool, auth_service: AuthService) -> Router {
    let plan_service = WorkoutPlanService::new(db);

    let protected = Router::new()
        .route("/criar-plano", post(create_plan))
        .route("/planos-do-dia/:dia_semana_id", get(plans_for_weekday))
        .route("/tipos-de-treino-do-plano/:plano_id", get(plan_training_types))
        .route("/exercicios-do-plano/:plano_id", get(plan_exercises))
        .route("/excluir-plano/:plano_id", delete(delete_plan))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware));

    let catalog = Router::new()
        .route("/exercicios/:tipo_exercicio", get(exercises_by_type))
        .route("/exercicios/videos/:exercicio_id", get(exercise_video))
        .route("/tipos", get(training_types))
        .route("/dias-da-semana", get(weekdays));

    protected.merge(catalog).with_state(plan_service)
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn create_plan(
    State(service): State<WorkoutPlanService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateWorkoutPlanRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<CreateWorkoutPlanResponse>)> {
    let plan = service.create_plan(&session, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateWorkoutPlanResponse {
            message: "Workout plan created successfully.".to_string(),
            plan,
        }),
    ))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn plans_for_weekday(
    State(service): State<WorkoutPlanService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(weekday_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Vec<WorkoutPlanSummary>>> {
    let plans = service.plans_for_weekday(session.account_id, weekday_id).await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn plan_training_types(
    State(service): State<WorkoutPlanService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Vec<PlanTrainingTypeLink>>> {
    let types = service.plan_training_types(session.account_id, plan_id).await?;
    Ok(Json(types))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn plan_exercises(
    State(service): State<WorkoutPlanService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Vec<PlanExerciseLink>>> {
    let exercises = service.plan_exercises(session.account_id, plan_id).await?;
    Ok(Json(exercises))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn delete_plan(
    State(service): State<WorkoutPlanService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(plan_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    service.delete_plan(session.account_id, plan_id).await?;
    Ok(Json(MessageResponse::new("Workout plan deleted successfully.")))
}

#[tracing::instrument(skip(service))]
async fn exercises_by_type(
    State(service): State<WorkoutPlanService>,
    WithRejection(Path(training_type_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Vec<Exercise>>> {
    let exercises = service.exercises_by_type(training_type_id).await?;
    Ok(Json(exercises))
}

#[tracing::instrument(skip(service))]
async fn exercise_video(
    State(service): State<WorkoutPlanService>,
    WithRejection(Path(exercise_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<ExerciseVideo>> {
    let video = service.exercise_video(exercise_id).await?;
    Ok(Json(video))
}

#[tracing::instrument(skip(service))]
async fn training_types(State(service): State<WorkoutPlanService>) -> ApiResult<Json<Vec<TrainingType>>> {
    Ok(Json(service.training_types().await?))
}

#[tracing::instrument(skip(service))]
async fn weekdays(State(service): State<WorkoutPlanService>) -> ApiResult<Json<Vec<Weekday>>> {
    Ok(Json(service.weekdays().await?))
}
