use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Weekday {
    pub id: i32,
    pub nome: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrainingType {
    pub id: i32,
    pub nome: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    #[serde(rename = "tipoDeTreinoId")]
    pub training_type_id: i32,
    #[serde(rename = "musculoAlvo")]
    pub target_muscle: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExerciseVideo {
    pub nome: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutPlan {
    pub id: i32,
    pub nome: String,
    #[serde(rename = "contaId")]
    pub account_id: i32,
    #[serde(rename = "criadoPorId")]
    pub created_by_id: i32,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "diaSemanaId")]
    pub weekday_id: i32,
}

impl WorkoutPlan {
    /// Owner or author may read the plan's contents
    pub fn is_visible_to(&self, account_id: i32) -> bool {
        self.account_id == account_id || self.created_by_id == account_id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NameRef {
    pub nome: String,
}

/// Plan listing entry with author and weekday names
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutPlanSummary {
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub criador: NameRef,
    #[serde(rename = "diaSemana")]
    pub weekday: NameRef,
}

#[derive(Debug, Clone, FromRow)]
pub struct WorkoutPlanSummaryRow {
    pub id: i32,
    pub nome: String,
    pub account_id: i32,
    pub created_by_id: i32,
    pub created_at: DateTime<Utc>,
    pub weekday_id: i32,
    pub creator_name: String,
    pub weekday_name: String,
}

impl From<WorkoutPlanSummaryRow> for WorkoutPlanSummary {
    fn from(row: WorkoutPlanSummaryRow) -> Self {
        Self {
            plan: WorkoutPlan {
                id: row.id,
                nome: row.nome,
                account_id: row.account_id,
                created_by_id: row.created_by_id,
                created_at: row.created_at,
                weekday_id: row.weekday_id,
            },
            criador: NameRef { nome: row.creator_name },
            weekday: NameRef { nome: row.weekday_name },
        }
    }
}

/// `tiposdetreinonoplano` entry
#[derive(Debug, Clone, Serialize)]
pub struct PlanTrainingTypeLink {
    pub id: i32,
    #[serde(rename = "tipoDeTreino")]
    pub training_type: TrainingType,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanExerciseInfo {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    #[serde(rename = "tipoDeTreinoId")]
    pub training_type_id: i32,
}

/// `exerciciosnoplano` entry
#[derive(Debug, Clone, Serialize)]
pub struct PlanExerciseLink {
    pub id: i32,
    pub duracao: i32,
    #[serde(rename = "exercicio")]
    pub exercise: PlanExerciseInfo,
}

#[derive(Debug, Clone, FromRow)]
pub struct PlanExerciseRow {
    pub link_id: i32,
    pub duracao: i32,
    pub exercise_id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub training_type_id: i32,
}

impl From<PlanExerciseRow> for PlanExerciseLink {
    fn from(row: PlanExerciseRow) -> Self {
        Self {
            id: row.link_id,
            duracao: row.duracao,
            exercise: PlanExerciseInfo {
                id: row.exercise_id,
                nome: row.nome,
                descricao: row.descricao,
                training_type_id: row.training_type_id,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanExerciseInput {
    #[serde(alias = "exercicioId")]
    pub exercicio_id: i32,
    #[validate(range(min = 1, message = "duracao must be a positive number of minutes"))]
    pub duracao: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanTrainingTypeInput {
    #[serde(alias = "tipo_de_treino_id", alias = "tipoDeTreinoId")]
    pub tipo_id: i32,
    #[serde(default)]
    #[validate(nested)]
    pub exercicios: Vec<PlanExerciseInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkoutPlanRequest {
    #[serde(rename = "nomePlano", alias = "nome_plano")]
    #[validate(
        length(max = 255, message = "nomePlano is too long"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[serde(rename = "diaSemanaId", alias = "dia_semana_id")]
    pub weekday_id: i32,
    /// Target account; defaults to the caller
    #[serde(rename = "contaId", alias = "conta_id", default)]
    pub account_id: Option<i32>,
    #[serde(rename = "tiposDeTreino", alias = "tipos_de_treino")]
    #[validate(length(min = 1, message = "At least one training type is required"), nested)]
    pub training_types: Vec<PlanTrainingTypeInput>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("nomePlano is required"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanExerciseDetail {
    pub duracao: i32,
    pub exercicio: ExerciseSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseSummary {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    #[serde(rename = "musculoAlvo")]
    pub musculo_alvo: String,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id,
            nome: exercise.nome.clone(),
            descricao: exercise.descricao.clone(),
            musculo_alvo: exercise.target_muscle.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanTrainingTypeDetail {
    #[serde(rename = "tipoTreino")]
    pub training_type: TrainingType,
    pub exercicios: Vec<PlanExerciseDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedWorkoutPlan {
    pub id: i32,
    pub nome: String,
    #[serde(rename = "contaId")]
    pub account_id: i32,
    #[serde(rename = "criadoPorId")]
    pub created_by_id: i32,
    #[serde(rename = "diaSemanaId")]
    pub weekday_id: i32,
    #[serde(rename = "tiposDeTreino")]
    pub training_types: Vec<PlanTrainingTypeDetail>,
}

#[derive(Debug, Serialize)]
pub struct CreateWorkoutPlanResponse {
    pub message: String,
    #[serde(rename = "planoDeTreino")]
    pub plan: CreatedWorkoutPlan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_plan_accepts_camel_case() {
        let request: CreateWorkoutPlanRequest = serde_json::from_value(json!({
            "nomePlano": "Plano A",
            "diaSemanaId": 1,
            "tiposDeTreino": [
                { "tipo_id": 1, "exercicios": [{ "exercicio_id": 1, "duracao": 30 }] }
            ]
        }))
        .unwrap();

        assert_eq!(request.name, "Plano A");
        assert!(request.account_id.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_plan_accepts_snake_case() {
        let request: CreateWorkoutPlanRequest = serde_json::from_value(json!({
            "nome_plano": "Plano de Treino X",
            "dia_semana_id": 1,
            "tipos_de_treino": [
                {
                    "tipo_de_treino_id": 2,
                    "exercicios": [
                        { "exercicio_id": 3, "duracao": 45 }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(request.weekday_id, 1);
        assert_eq!(request.training_types[0].tipo_id, 2);
    }

    #[test]
    fn test_create_plan_rejects_empty_types_and_bad_duration() {
        let empty: CreateWorkoutPlanRequest = serde_json::from_value(json!({
            "nomePlano": "Plano",
            "diaSemanaId": 1,
            "tiposDeTreino": []
        }))
        .unwrap();
        assert!(empty.validate().is_err());

        let zero_duration: CreateWorkoutPlanRequest = serde_json::from_value(json!({
            "nomePlano": "Plano",
            "diaSemanaId": 1,
            "tiposDeTreino": [{ "tipo_id": 1, "exercicios": [{ "exercicio_id": 1, "duracao": 0 }] }]
        }))
        .unwrap();
        assert!(zero_duration.validate().is_err());
    }

    #[test]
    fn test_create_plan_rejects_blank_name() {
        let blank: CreateWorkoutPlanRequest = serde_json::from_value(json!({
            "nomePlano": "   ",
            "diaSemanaId": 1,
            "tiposDeTreino": [{ "tipo_id": 1, "exercicios": [{ "exercicio_id": 1, "duracao": 30 }] }]
        }))
        .unwrap();

        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_plan_visibility() {
        let plan = WorkoutPlan {
            id: 1,
            nome: "Plano".to_string(),
            account_id: 10,
            created_by_id: 20,
            created_at: Utc::now(),
            weekday_id: 1,
        };

        assert!(plan.is_visible_to(10));
        assert!(plan.is_visible_to(20));
        assert!(!plan.is_visible_to(30));
    }
}
