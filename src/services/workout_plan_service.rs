use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

use crate::auth::UserSession;
use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::models::{
    CreateWorkoutPlanRequest, CreatedWorkoutPlan, Exercise, ExerciseSummary, ExerciseVideo,
    PlanExerciseDetail, PlanExerciseLink, PlanExerciseRow, PlanTrainingTypeDetail,
    PlanTrainingTypeLink, TrainingType, Weekday, WorkoutPlan, WorkoutPlanSummary,
    WorkoutPlanSummaryRow,
};

const PLAN_COLUMNS: &str = "id, nome, contaid AS account_id, criadoporid AS created_by_id, \
     datacriacao AS created_at, diasemanaid AS weekday_id";

const EXERCISE_COLUMNS: &str =
    "id, nome, descricao, tipodetreinoid AS training_type_id, musculoalvo AS target_muscle";

/// Workout plans and the exercise catalog they draw from
#[derive(Clone)]
pub struct WorkoutPlanService {
    db: PgPool,
}

impl WorkoutPlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a plan authored by the caller. Only trainers may target another account.
    pub async fn create_plan(
        &self,
        session: &UserSession,
        request: CreateWorkoutPlanRequest,
    ) -> ApiResult<CreatedWorkoutPlan> {
        request.validate()?;

        let owner_id = request.account_id.unwrap_or(session.account_id);
        if owner_id != session.account_id && !session.is_trainer() {
            tracing::warn!(
                account_id = session.account_id,
                owner_id,
                "Rejected plan creation for another account"
            );
            return Err(ApiError::forbidden(
                "Only personal trainers can create plans for other accounts.",
            ));
        }

        let mut tx = self.db.begin().await?;
        let plan = create_plan_in_tx(&mut tx, owner_id, session.account_id, &request).await?;
        tx.commit().await?;

        tracing::info!(plan_id = plan.id, owner_id, author_id = session.account_id, "Workout plan created");
        Ok(plan)
    }

    /// The caller's plans for a weekday, newest first
    pub async fn plans_for_weekday(&self, account_id: i32, weekday_id: i32) -> ApiResult<Vec<WorkoutPlanSummary>> {
        let rows = sqlx::query_as::<_, WorkoutPlanSummaryRow>(
            r#"
            SELECT p.id, p.nome, p.contaid AS account_id, p.criadoporid AS created_by_id,
                   p.datacriacao AS created_at, p.diasemanaid AS weekday_id,
                   c.nome AS creator_name, d.nome AS weekday_name
            FROM planosdetreino p
            JOIN contas c ON c.id = p.criadoporid
            JOIN diasdasemana d ON d.id = p.diasemanaid
            WHERE p.contaid = $1 AND p.diasemanaid = $2
            ORDER BY p.datacriacao DESC, p.id DESC
            "#,
        )
        .bind(account_id)
        .bind(weekday_id)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No workout plans found for this day."));
        }

        Ok(rows.into_iter().map(WorkoutPlanSummary::from).collect())
    }

    pub async fn plan_training_types(&self, account_id: i32, plan_id: i32) -> ApiResult<Vec<PlanTrainingTypeLink>> {
        self.find_visible_plan(account_id, plan_id).await?;

        let rows = sqlx::query_as::<_, (i32, i32, String)>(
            r#"
            SELECT l.id, t.id, t.nome
            FROM tiposdetreinonoplano l
            JOIN tipodetreinos t ON t.id = l.tipodetreinoid
            WHERE l.planoid = $1
            ORDER BY l.id
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No training types found for this plan."));
        }

        Ok(rows
            .into_iter()
            .map(|(id, type_id, nome)| PlanTrainingTypeLink {
                id,
                training_type: TrainingType { id: type_id, nome },
            })
            .collect())
    }

    pub async fn plan_exercises(&self, account_id: i32, plan_id: i32) -> ApiResult<Vec<PlanExerciseLink>> {
        self.find_visible_plan(account_id, plan_id).await?;

        let rows = sqlx::query_as::<_, PlanExerciseRow>(
            r#"
            SELECT l.id AS link_id, l.duracao, e.id AS exercise_id, e.nome, e.descricao,
                   e.tipodetreinoid AS training_type_id
            FROM exerciciosnoplano l
            JOIN exercicios e ON e.id = l.exercicioid
            WHERE l.planoid = $1
            ORDER BY l.id
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No exercises found for this plan."));
        }

        Ok(rows.into_iter().map(PlanExerciseLink::from).collect())
    }

    /// Delete a plan owned by the caller; links cascade
    pub async fn delete_plan(&self, account_id: i32, plan_id: i32) -> ApiResult<()> {
        let plan = self.find_plan(plan_id).await?;

        if plan.account_id != account_id {
            tracing::warn!(account_id, plan_id, "Rejected deletion of another account's plan");
            return Err(ApiError::forbidden("You do not have permission to delete this plan."));
        }

        sqlx::query("DELETE FROM planosdetreino WHERE id = $1")
            .bind(plan_id)
            .execute(&self.db)
            .await?;

        tracing::info!(account_id, plan_id, "Workout plan deleted");
        Ok(())
    }

    async fn find_plan(&self, plan_id: i32) -> ApiResult<WorkoutPlan> {
        sqlx::query_as::<_, WorkoutPlan>(&format!("SELECT {PLAN_COLUMNS} FROM planosdetreino WHERE id = $1"))
            .bind(plan_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Workout plan not found."))
    }

    async fn find_visible_plan(&self, account_id: i32, plan_id: i32) -> ApiResult<WorkoutPlan> {
        let plan = self.find_plan(plan_id).await?;

        if !plan.is_visible_to(account_id) {
            tracing::warn!(account_id, plan_id, "Rejected read of another account's plan");
            return Err(ApiError::forbidden("You do not have permission to view this plan."));
        }

        Ok(plan)
    }

    /// Exercise catalog for a training type
    pub async fn exercises_by_type(&self, training_type_id: i32) -> ApiResult<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercicios WHERE tipodetreinoid = $1 ORDER BY nome"
        ))
        .bind(training_type_id)
        .fetch_all(&self.db)
        .await?;

        if exercises.is_empty() {
            return Err(ApiError::not_found("No exercises found for this training type."));
        }

        Ok(exercises)
    }

    pub async fn exercise_video(&self, exercise_id: i32) -> ApiResult<ExerciseVideo> {
        sqlx::query_as::<_, ExerciseVideo>(
            "SELECT nome, url FROM videos WHERE exercicioid = $1 ORDER BY id LIMIT 1",
        )
        .bind(exercise_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found for this exercise."))
    }

    pub async fn training_types(&self) -> ApiResult<Vec<TrainingType>> {
        let types = sqlx::query_as::<_, TrainingType>("SELECT id, nome FROM tipodetreinos ORDER BY id")
            .fetch_all(&self.db)
            .await?;
        Ok(types)
    }

    pub async fn weekdays(&self) -> ApiResult<Vec<Weekday>> {
        let days = sqlx::query_as::<_, Weekday>("SELECT id, nome FROM diasdasemana ORDER BY id")
            .fetch_all(&self.db)
            .await?;
        Ok(days)
    }
}

/// Insert a plan with its training-type and exercise links inside `tx`.
/// Any error leaves the transaction to be rolled back by the caller.
pub async fn create_plan_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    owner_id: i32,
    author_id: i32,
    request: &CreateWorkoutPlanRequest,
) -> ApiResult<CreatedWorkoutPlan> {
    let owner_exists = sqlx::query_scalar::<_, i32>("SELECT id FROM contas WHERE id = $1")
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await?;
    if owner_exists.is_none() {
        return Err(ApiError::not_found("Account not found."));
    }

    let weekday = sqlx::query_scalar::<_, i32>("SELECT id FROM diasdasemana WHERE id = $1")
        .bind(request.weekday_id)
        .fetch_optional(&mut **tx)
        .await?;
    if weekday.is_none() {
        return Err(ApiError::bad_request("Invalid weekday."));
    }

    let name = request.name.trim();

    let name_taken = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM planosdetreino WHERE contaid = $1 AND nome = $2",
    )
    .bind(owner_id)
    .bind(name)
    .fetch_optional(&mut **tx)
    .await?;
    if name_taken.is_some() {
        return Err(duplicate_plan_name());
    }

    let plan_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO planosdetreino (nome, contaid, criadoporid, diasemanaid)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(name)
    .bind(owner_id)
    .bind(author_id)
    .bind(request.weekday_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|err| if is_unique_violation(&err) { duplicate_plan_name() } else { err.into() })?;

    let mut training_types = Vec::with_capacity(request.training_types.len());

    for type_input in &request.training_types {
        let training_type = sqlx::query_as::<_, TrainingType>("SELECT id, nome FROM tipodetreinos WHERE id = $1")
            .bind(type_input.tipo_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                ApiError::bad_request(format!("Training type {} not found.", type_input.tipo_id))
            })?;

        sqlx::query("INSERT INTO tiposdetreinonoplano (planoid, tipodetreinoid) VALUES ($1, $2)")
            .bind(plan_id)
            .bind(training_type.id)
            .execute(&mut **tx)
            .await?;

        let mut exercises = Vec::with_capacity(type_input.exercicios.len());

        for exercise_input in &type_input.exercicios {
            let exercise = sqlx::query_as::<_, Exercise>(&format!(
                "SELECT {EXERCISE_COLUMNS} FROM exercicios WHERE id = $1"
            ))
            .bind(exercise_input.exercicio_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                ApiError::bad_request(format!("Exercise {} not found.", exercise_input.exercicio_id))
            })?;

            if exercise.training_type_id != training_type.id {
                return Err(ApiError::bad_request(format!(
                    "Exercise {} does not belong to training type {}.",
                    exercise.id, training_type.id
                )));
            }

            sqlx::query("INSERT INTO exerciciosnoplano (planoid, exercicioid, duracao) VALUES ($1, $2, $3)")
                .bind(plan_id)
                .bind(exercise.id)
                .bind(exercise_input.duracao)
                .execute(&mut **tx)
                .await?;

            exercises.push(PlanExerciseDetail {
                duracao: exercise_input.duracao,
                exercicio: ExerciseSummary::from(&exercise),
            });
        }

        training_types.push(PlanTrainingTypeDetail {
            training_type,
            exercicios: exercises,
        });
    }

    Ok(CreatedWorkoutPlan {
        id: plan_id,
        nome: name.to_string(),
        account_id: owner_id,
        created_by_id: author_id,
        weekday_id: request.weekday_id,
        training_types,
    })
}

fn duplicate_plan_name() -> ApiError {
    ApiError::bad_request("A workout plan with this name already exists for this account.")
}
