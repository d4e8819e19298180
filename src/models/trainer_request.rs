use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::CreatedWorkoutPlan;

/// Lifecycle of a training-plan request: Pendente → Concluida | Cancelada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "estado_solicitacao")]
pub enum RequestStatus {
    #[serde(rename = "Pendente")]
    #[sqlx(rename = "Pendente")]
    Pending,
    #[serde(rename = "Concluida")]
    #[sqlx(rename = "Concluida")]
    Completed,
    #[serde(rename = "Cancelada")]
    #[sqlx(rename = "Cancelada")]
    Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrainerRequest {
    pub id: i32,
    #[serde(rename = "usuarioId")]
    pub user_id: i32,
    #[serde(rename = "personalId")]
    pub trainer_id: i32,
    #[serde(rename = "diaSemanaId")]
    pub weekday_id: i32,
    pub objetivo: String,
    pub descricao: String,
    pub estado: RequestStatus,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainerAccountInfo {
    pub id: i32,
    #[serde(rename = "Nome")]
    pub nome: String,
    #[serde(rename = "Peso")]
    pub peso: f64,
    #[serde(rename = "Altura")]
    pub altura: f64,
}

/// Public trainer directory entry
#[derive(Debug, Clone, Serialize)]
pub struct TrainerListing {
    pub id: i32,
    pub especialidade: Option<String>,
    pub certificado: Option<String>,
    pub conta: TrainerAccountInfo,
}

#[derive(Debug, Clone, FromRow)]
pub struct TrainerListingRow {
    pub id: i32,
    pub especialidade: Option<String>,
    pub certificado: Option<String>,
    pub account_id: i32,
    pub nome: String,
    pub peso: f64,
    pub altura: f64,
}

impl From<TrainerListingRow> for TrainerListing {
    fn from(row: TrainerListingRow) -> Self {
        Self {
            id: row.id,
            especialidade: row.especialidade,
            certificado: row.certificado,
            conta: TrainerAccountInfo {
                id: row.account_id,
                nome: row.nome,
                peso: row.peso,
                altura: row.altura,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequesterAccount {
    pub id: i32,
    pub nome: String,
    pub peso: f64,
    pub altura: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Requester {
    pub id: i32,
    pub objetivo: Option<String>,
    pub conta: RequesterAccount,
}

/// Pending request as shown to the trainer
#[derive(Debug, Clone, Serialize)]
pub struct PendingTrainerRequest {
    #[serde(flatten)]
    pub request: TrainerRequest,
    pub usuario: Requester,
}

#[derive(Debug, Clone, FromRow)]
pub struct PendingTrainerRequestRow {
    pub id: i32,
    pub user_id: i32,
    pub trainer_id: i32,
    pub weekday_id: i32,
    pub objetivo: String,
    pub descricao: String,
    pub estado: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub user_goal: Option<String>,
    pub account_id: i32,
    pub nome: String,
    pub peso: f64,
    pub altura: f64,
}

impl From<PendingTrainerRequestRow> for PendingTrainerRequest {
    fn from(row: PendingTrainerRequestRow) -> Self {
        Self {
            request: TrainerRequest {
                id: row.id,
                user_id: row.user_id,
                trainer_id: row.trainer_id,
                weekday_id: row.weekday_id,
                objetivo: row.objetivo,
                descricao: row.descricao,
                estado: row.estado,
                created_at: row.created_at,
            },
            usuario: Requester {
                id: row.user_id,
                objetivo: row.user_goal,
                conta: RequesterAccount {
                    id: row.account_id,
                    nome: row.nome,
                    peso: row.peso,
                    altura: row.altura,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrainerRequest {
    #[serde(alias = "personalId")]
    pub personal_id: i32,
    #[validate(length(min = 1, message = "objetivo is required"))]
    pub objetivo: String,
    #[validate(length(min = 1, message = "descricao is required"))]
    pub descricao: String,
    #[serde(rename = "diasSemana", alias = "dias_semana", default)]
    #[validate(length(
        min = 1,
        message = "Weekdays must be provided as an array with at least one day."
    ))]
    pub weekdays: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreateTrainerRequestsResponse {
    pub message: String,
    pub solicitacoes: Vec<TrainerRequest>,
}

#[derive(Debug, Serialize)]
pub struct RespondTrainerRequestResponse {
    pub message: String,
    pub solicitacao: TrainerRequest,
    #[serde(rename = "planoDeTreino")]
    pub plan: CreatedWorkoutPlan,
}

#[derive(Debug, Serialize)]
pub struct TrainerRequestResponse {
    pub message: String,
    pub solicitacao: TrainerRequest,
}
