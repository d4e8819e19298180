use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::models::{
    CalorieGoal, DailySummary, Food, LogMealRequest, MealEntry, MealEntryFoodRow,
    MealEntryWithFood, MealType, NutrientTotals, SetCalorieGoalRequest, UpdateMealRequest,
};

const MEAL_COLUMNS: &str =
    "id, contaid AS account_id, data_registro, tipo_id, alimento_id, quantidade_gramas";

const FOOD_COLUMNS: &str =
    "id, nome_alimento AS name, tipo_id AS meal_type_id, calorias AS calories, \
     proteinas AS proteins, gorduras AS fats";

/// Result of a calorie-goal upsert
#[derive(Debug, Clone)]
pub enum GoalUpsert {
    Created(CalorieGoal),
    Updated(CalorieGoal),
}

#[derive(FromRow)]
struct CalorieGoalUpsertRow {
    id: i32,
    account_id: i32,
    meta_calorias: i32,
    data_registro: NaiveDate,
    inserted: bool,
}

#[derive(Clone)]
pub struct NutritionService {
    db: PgPool,
}

impl NutritionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create or replace the caller's calorie goal for a date
    pub async fn set_calorie_goal(
        &self,
        account_id: i32,
        request: SetCalorieGoalRequest,
    ) -> ApiResult<GoalUpsert> {
        request.validate()?;

        // xmax is zero only for freshly inserted tuples
        let row = sqlx::query_as::<_, CalorieGoalUpsertRow>(
            r#"
            INSERT INTO calorias_meta (contaid, meta_calorias, data_registro)
            VALUES ($1, $2, $3)
            ON CONFLICT (contaid, data_registro)
            DO UPDATE SET meta_calorias = EXCLUDED.meta_calorias
            RETURNING id, contaid AS account_id, meta_calorias, data_registro, (xmax = 0) AS inserted
            "#,
        )
        .bind(account_id)
        .bind(request.meta_calorias)
        .bind(request.data_registro)
        .fetch_one(&self.db)
        .await?;

        let goal = CalorieGoal {
            id: row.id,
            account_id: row.account_id,
            meta_calorias: row.meta_calorias,
            data_registro: row.data_registro,
        };

        if row.inserted {
            tracing::info!(account_id, date = %goal.data_registro, "Calorie goal created");
            Ok(GoalUpsert::Created(goal))
        } else {
            tracing::info!(account_id, date = %goal.data_registro, "Calorie goal updated");
            Ok(GoalUpsert::Updated(goal))
        }
    }

    pub async fn get_calorie_goal(&self, account_id: i32, date: NaiveDate) -> ApiResult<CalorieGoal> {
        self.find_calorie_goal(account_id, date)
            .await?
            .ok_or_else(|| ApiError::not_found("No calorie goal set for this date."))
    }

    async fn find_calorie_goal(&self, account_id: i32, date: NaiveDate) -> ApiResult<Option<CalorieGoal>> {
        let goal = sqlx::query_as::<_, CalorieGoal>(
            "SELECT id, contaid AS account_id, meta_calorias, data_registro
             FROM calorias_meta WHERE contaid = $1 AND data_registro = $2",
        )
        .bind(account_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(goal)
    }

    /// Log a food eaten by the caller
    pub async fn log_meal(&self, account_id: i32, request: LogMealRequest) -> ApiResult<MealEntry> {
        request.validate()?;

        let (Some(date), Some(meal_type_id), Some(food_id), Some(grams)) = (
            request.data_registro,
            request.tipo_id,
            request.alimento_id,
            request.quantidade_gramas,
        ) else {
            return Err(ApiError::bad_request("All fields are required."));
        };

        let food = sqlx::query_as::<_, Food>(&format!("SELECT {FOOD_COLUMNS} FROM alimentos WHERE id = $1"))
            .bind(food_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::bad_request("Food not found."))?;

        let meal_type = sqlx::query_as::<_, MealType>(
            "SELECT id, tipo_nome AS name FROM tipos_alimentos WHERE id = $1",
        )
        .bind(meal_type_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::bad_request("Meal type not found."))?;

        if food.meal_type_id != meal_type.id {
            tracing::debug!(food_id, meal_type_id, "Food does not belong to meal type");
            return Err(ApiError::bad_request("The food does not belong to the provided meal type."));
        }

        let already_logged = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM refeicoes WHERE contaid = $1 AND data_registro = $2 AND alimento_id = $3",
        )
        .bind(account_id)
        .bind(date)
        .bind(food_id)
        .fetch_optional(&self.db)
        .await?;

        if already_logged.is_some() {
            return Err(duplicate_meal());
        }

        let entry = sqlx::query_as::<_, MealEntry>(&format!(
            "INSERT INTO refeicoes (contaid, data_registro, tipo_id, alimento_id, quantidade_gramas)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MEAL_COLUMNS}"
        ))
        .bind(account_id)
        .bind(date)
        .bind(meal_type_id)
        .bind(food_id)
        .bind(grams)
        .fetch_one(&self.db)
        .await
        .map_err(|err| if is_unique_violation(&err) { duplicate_meal() } else { err.into() })?;

        tracing::info!(account_id, meal_id = entry.id, "Meal logged");
        Ok(entry)
    }

    pub async fn update_meal(
        &self,
        account_id: i32,
        meal_id: i32,
        request: UpdateMealRequest,
    ) -> ApiResult<MealEntry> {
        request.validate()?;
        let grams = request
            .quantidade_gramas
            .ok_or_else(|| ApiError::bad_request("quantidade_gramas was not provided."))?;

        self.find_owned_meal(account_id, meal_id).await?;

        let entry = sqlx::query_as::<_, MealEntry>(&format!(
            "UPDATE refeicoes SET quantidade_gramas = $2 WHERE id = $1 AND contaid = $3 RETURNING {MEAL_COLUMNS}"
        ))
        .bind(meal_id)
        .bind(grams)
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal entry not found."))?;

        Ok(entry)
    }

    pub async fn delete_meal(&self, account_id: i32, meal_id: i32) -> ApiResult<()> {
        self.find_owned_meal(account_id, meal_id).await?;

        sqlx::query("DELETE FROM refeicoes WHERE id = $1 AND contaid = $2")
            .bind(meal_id)
            .bind(account_id)
            .execute(&self.db)
            .await?;

        tracing::info!(account_id, meal_id, "Meal removed");
        Ok(())
    }

    async fn find_owned_meal(&self, account_id: i32, meal_id: i32) -> ApiResult<MealEntry> {
        let entry = sqlx::query_as::<_, MealEntry>(&format!("SELECT {MEAL_COLUMNS} FROM refeicoes WHERE id = $1"))
            .bind(meal_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Meal entry not found."))?;

        if entry.account_id != account_id {
            tracing::warn!(account_id, meal_id, "Rejected access to another account's meal");
            return Err(ApiError::forbidden("You do not have permission to modify this meal entry."));
        }

        Ok(entry)
    }

    /// Foods of a meal type; public catalog
    pub async fn foods_by_meal_type(&self, meal_type_id: i32) -> ApiResult<Vec<Food>> {
        let foods = sqlx::query_as::<_, Food>(&format!(
            "SELECT {FOOD_COLUMNS} FROM alimentos WHERE tipo_id = $1 ORDER BY nome_alimento"
        ))
        .bind(meal_type_id)
        .fetch_all(&self.db)
        .await?;

        if foods.is_empty() {
            return Err(ApiError::not_found("No foods found for this meal type."));
        }

        Ok(foods)
    }

    /// The caller's meals for a date, each with its food
    pub async fn meals_for_date(&self, account_id: i32, date: NaiveDate) -> ApiResult<Vec<MealEntryWithFood>> {
        let rows = sqlx::query_as::<_, MealEntryFoodRow>(
            r#"
            SELECT r.id, r.contaid AS account_id, r.data_registro, r.tipo_id, r.alimento_id,
                   r.quantidade_gramas, a.nome_alimento, a.calorias, a.proteinas, a.gorduras
            FROM refeicoes r
            JOIN alimentos a ON a.id = r.alimento_id
            WHERE r.contaid = $1 AND r.data_registro = $2
            ORDER BY r.tipo_id, r.id
            "#,
        )
        .bind(account_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No meals found for this date."));
        }

        Ok(rows.into_iter().map(MealEntryWithFood::from).collect())
    }

    /// Σ(nutrient × grams / 100) over the caller's entries for a date
    pub async fn daily_summary(&self, account_id: i32, date: NaiveDate) -> ApiResult<DailySummary> {
        let totals = sqlx::query_as::<_, NutrientTotals>(
            r#"
            SELECT
                COALESCE(SUM(a.calorias * r.quantidade_gramas / 100.0), 0)::FLOAT8 AS calorias,
                COALESCE(SUM(a.proteinas * r.quantidade_gramas / 100.0), 0)::FLOAT8 AS proteinas,
                COALESCE(SUM(a.gorduras * r.quantidade_gramas / 100.0), 0)::FLOAT8 AS gorduras
            FROM refeicoes r
            JOIN alimentos a ON a.id = r.alimento_id
            WHERE r.contaid = $1 AND r.data_registro = $2
            "#,
        )
        .bind(account_id)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        let goal = self.find_calorie_goal(account_id, date).await?;
        let empty = totals == NutrientTotals::default();

        let mut summary = DailySummary::new(date, totals, goal.map(|g| g.meta_calorias));
        if empty {
            summary.message = Some("No meals logged for this date.".to_string());
        }

        Ok(summary)
    }
}

fn duplicate_meal() -> ApiError {
    ApiError::bad_request("This food has already been logged for this date.")
}
