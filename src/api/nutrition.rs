use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::auth::{jwt_auth_middleware, AuthService, MessageResponse, UserSession};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CalorieGoal, DailySummary, DateQuery, LogMealRequest, SetCalorieGoalRequest, UpdateMealRequest,
};
use crate::services::{GoalUpsert, NutritionService};

pub fn nutrition_routes(db: PgPool, auth_service: AuthService) -> Router {
    let nutrition_service = NutritionService::new(db);

    let protected = Router::new()
        .route("/meta-calorias", post(set_calorie_goal).get(get_calorie_goal))
        .route("/comeu", post(log_meal))
        .route("/comeu/:id", put(update_meal))
        .route("/remover/:id", delete(delete_meal))
        .route("/consumido/:data_registro", get(meals_for_date))
        .route("/resumo-diario", get(daily_summary))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware));

    let public = Router::new().route("/alimentos/tipo_refeicao/:tipo", get(foods_by_meal_type));

    protected.merge(public).with_state(nutrition_service)
}

fn required_date(query: DateQuery) -> ApiResult<NaiveDate> {
    query
        .data_registro
        .ok_or_else(|| ApiError::bad_request("data_registro is required."))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn set_calorie_goal(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<SetCalorieGoalRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    match service.set_calorie_goal(session.account_id, request).await? {
        GoalUpsert::Created(goal) => Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Calorie goal created successfully.", "novaMeta": goal })),
        )),
        GoalUpsert::Updated(goal) => Ok((
            StatusCode::OK,
            Json(json!({ "message": "Calorie goal updated successfully.", "meta": goal })),
        )),
    }
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn get_calorie_goal(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<DateQuery>, ApiError>,
) -> ApiResult<Json<CalorieGoal>> {
    let date = required_date(query)?;
    let goal = service.get_calorie_goal(session.account_id, date).await?;
    Ok(Json(goal))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn log_meal(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<LogMealRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let entry = service.log_meal(session.account_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Meal logged successfully.", "refeicao": entry })),
    ))
}

#[tracing::instrument(skip(service, session, request), fields(account_id = session.account_id))]
async fn update_meal(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(meal_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateMealRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    let entry = service.update_meal(session.account_id, meal_id, request).await?;
    Ok(Json(json!({ "message": "Meal entry updated successfully.", "consumo": entry })))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn delete_meal(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(meal_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    service.delete_meal(session.account_id, meal_id).await?;
    Ok(Json(MessageResponse::new("Meal entry removed successfully.")))
}

#[tracing::instrument(skip(service))]
async fn foods_by_meal_type(
    State(service): State<NutritionService>,
    WithRejection(Path(meal_type_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<Json<Value>> {
    let foods = service.foods_by_meal_type(meal_type_id).await?;
    Ok(Json(json!({ "alimentos": foods })))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn meals_for_date(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(date), _): WithRejection<Path<NaiveDate>, ApiError>,
) -> ApiResult<Json<Value>> {
    let meals = service.meals_for_date(session.account_id, date).await?;
    Ok(Json(json!({ "refeicoes": meals })))
}

#[tracing::instrument(skip(service, session), fields(account_id = session.account_id))]
async fn daily_summary(
    State(service): State<NutritionService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<DateQuery>, ApiError>,
) -> ApiResult<Json<DailySummary>> {
    let date = required_date(query)?;
    let summary = service.daily_summary(session.account_id, date).await?;
    Ok(Json(summary))
}
